mod avatar;
mod config;
mod error;
mod output;
mod preferences;
mod roster;
mod service;
mod session;

pub use avatar::*;
pub use config::*;
pub use error::*;
pub use output::*;
pub use preferences::*;
pub use roster::*;
pub use service::*;
pub use session::*;
