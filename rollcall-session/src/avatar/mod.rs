mod avatar_fetcher;
mod avatar_loader;

pub use avatar_fetcher::*;
pub use avatar_loader::*;
