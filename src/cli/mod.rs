//! CLI command implementations

pub mod grant;
pub mod init;
pub mod serve;
pub mod status;
