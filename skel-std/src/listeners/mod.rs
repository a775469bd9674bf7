//! Standard listener implementations.

pub mod filter;
pub mod logging;

pub use filter::FilterListener;
pub use logging::LoggingListener;
