//! Logging macros for layout diagnostics.
//!
//! With the `tracing` feature the engine's `debug!`/`warn!` calls go straight
//! to `tracing`. Without it they compile away, so malformed markup costs
//! nothing beyond the returned error.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
