//! Platform abstraction layer
//!
//! This module provides the backup memory abstraction the store persists to,
//! plus ready-made devices for retained RAM and host tests.

pub mod error;
pub mod slice;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{MemoryError, PlatformError, Result};
pub use slice::SliceMemory;
pub use traits::BackupMemory;
