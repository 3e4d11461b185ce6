//! Command implementations for the hocon CLI

pub mod get;
pub mod resolve;
