//! CLI command implementations
//!
//! Each submodule is one linear operation against the deployed ImageStore
//! contract: connect, invoke one method, touch one file.

pub mod retrieve;
pub mod store;
