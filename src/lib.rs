// HTTP relay server modules
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;
pub mod state;

// Completion API layer
pub mod llm;

// Client-side data access (backend-as-a-service + relay endpoints)
pub mod client;
