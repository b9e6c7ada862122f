mod preference_store;

pub use preference_store::*;
