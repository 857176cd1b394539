//! OpenAI provider implementation
//!
//! Streams from the Responses API and relays uploads to the Files API.

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

pub use client::{mask_token, OpenAiClient, DEFAULT_BASE_URL};
