mod conferencing_service;
mod event_sender;
mod loopback_service;

pub use conferencing_service::*;
pub use event_sender::*;
pub use loopback_service::*;
