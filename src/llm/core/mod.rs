//! Core abstractions for the completion API layer

pub mod config;
pub mod error;
pub mod provider;
pub mod types;
