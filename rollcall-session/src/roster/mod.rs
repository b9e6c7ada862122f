mod reconciler;
mod roster;

pub use reconciler::*;
pub use roster::*;
