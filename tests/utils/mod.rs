pub mod actions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::rating_result;
#[allow(unused_imports)]
pub use mocks::{MockScoreStore, StaticNameSource};
#[allow(unused_imports)]
pub use setup::{TestStack, TestStackBuilder};
