use std::sync::Arc;

use rollcall_core::{ConferenceTarget, SessionState};
use rollcall_session::{LAST_CONFERENCE_ID_KEY, LoopbackService, PreferenceStore};

use crate::integration::{LOCAL_ID, create_test_session, init_tracing};
use crate::utils::MockAvatarFetcher;

#[tokio::test]
async fn test_demo_conference_uses_assigned_alias() {
    init_tracing();

    let service = Arc::new(LoopbackService::new(LOCAL_ID));
    let session = create_test_session(
        service.clone(),
        ConferenceTarget::CreateDemo,
        Arc::new(MockAvatarFetcher::new()),
    );
    assert!(session.output.wait_for_state(SessionState::Active, 2000).await);

    assert_eq!(session.output.joined().await, Some("demo-1".into()));
    assert_eq!(session.preferences.get(LAST_CONFERENCE_ID_KEY).unwrap(), None);
    assert!(service.is_joined());

    session.handle.send_message("hi all").await.expect("broadcast");
    assert_eq!(service.sent_messages(), vec!["hi all".to_string()]);

    session.handle.hang_up().await.expect("hang up");
    session.task.await.expect("session task").expect("session result");
}
