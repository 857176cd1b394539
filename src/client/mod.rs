//! Client-side data access
//!
//! Everything a front end needs: CRUD on the backend-as-a-service tables,
//! email/password auth, and calls to this server's chat and upload endpoints.
//!
//! ```no_run
//! use chat_relay::client::{BaasClient, RelayClient};
//! use chat_relay::models::ChatMessage;
//!
//! # async fn example() -> Result<(), chat_relay::client::ClientError> {
//! let anon = BaasClient::new("https://project.supabase.co", "anon-key")?;
//! let session = anon.auth().login("me@example.com", "hunter2").await?;
//! let baas = anon.with_session(session.clone());
//!
//! let project = baas.projects().create("Research", "Cite your sources.").await?;
//! let conversation = baas.conversations().create(project.id).await?;
//! baas.messages().save(conversation, "user", "Hello").await?;
//!
//! let relay = RelayClient::new("http://localhost:3000", session.access_token)?;
//! let messages = vec![ChatMessage::new("user", "Hello")];
//! relay.stream_chat(&messages, project.id, |chunk| print!("{}", chunk)).await?;
//! # Ok(())
//! # }
//! ```

pub mod baas;
pub mod error;
pub mod relay;
pub mod store;

pub use baas::{AuthClient, BaasClient, Order, Query, Registration, Session};
pub use error::ClientError;
pub use relay::RelayClient;
pub use store::{Conversation, Project, ProjectFile, StoredMessage};
