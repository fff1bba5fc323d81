//! Platform abstraction traits
//!
//! This module defines the traits that memory device implementations must provide.

pub mod memory;

pub use memory::BackupMemory;
