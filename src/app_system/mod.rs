//! Console startup and shutdown.

pub mod console_system;
pub mod tracing;

pub use console_system::*;
pub use self::tracing::*;
