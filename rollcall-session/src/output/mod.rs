mod channel_output;
mod presentation_output;

pub use channel_output::*;
pub use presentation_output::*;
