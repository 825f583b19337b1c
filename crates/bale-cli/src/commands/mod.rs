//! CLI command implementations.

pub mod checksum;
pub mod completion;
pub mod pack;
