//! CLI command implementations

pub mod collect;
pub mod init;
pub mod status;
pub mod validate;
