mod test_demo_conference;
mod test_event_gating;
mod test_session_config;
