//! Library components of the `sleep-integrate` binary.

pub mod logging;
pub mod pipeline;
pub mod types;
