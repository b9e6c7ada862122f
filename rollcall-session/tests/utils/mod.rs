
pub use mock_fetcher::*;
pub use recording_output::*;
