//! Typed access to the project, conversation, message and file tables
//!
//! Records are plain rows; the backend enforces ownership and integrity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::baas::{BaasClient, Order, Query};
use super::error::ClientError;

pub const PROJECTS: &str = "projects";
pub const CONVERSATIONS: &str = "conversations";
pub const MESSAGES: &str = "messages";
pub const FILES: &str = "files";

pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub id: Uuid,
    pub project_id: Uuid,
    pub filename: String,
    pub openai_file_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct NewProject<'a> {
    name: &'a str,
    system_prompt: &'a str,
    user_id: Uuid,
}

#[derive(Serialize)]
struct NewConversation<'a> {
    project_id: Uuid,
    title: &'a str,
}

#[derive(Serialize)]
struct NewMessage<'a> {
    conversation_id: Uuid,
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct NewFile<'a> {
    project_id: Uuid,
    filename: &'a str,
    openai_file_id: &'a str,
}

/// PostgREST answers inserts with an array even for one row
fn single<R>(rows: Vec<R>, table: &str, id: impl ToString) -> Result<R, ClientError> {
    rows.into_iter().next().ok_or_else(|| ClientError::NotFound {
        table: table.to_string(),
        id: id.to_string(),
    })
}

impl BaasClient {
    pub fn projects(&self) -> ProjectStore<'_> {
        ProjectStore { baas: self }
    }

    pub fn conversations(&self) -> ConversationStore<'_> {
        ConversationStore { baas: self }
    }

    pub fn messages(&self) -> MessageStore<'_> {
        MessageStore { baas: self }
    }

    pub fn files(&self) -> FileStore<'_> {
        FileStore { baas: self }
    }
}

pub struct ProjectStore<'a> {
    baas: &'a BaasClient,
}

impl ProjectStore<'_> {
    /// Newest first
    pub async fn list(&self) -> Result<Vec<Project>, ClientError> {
        self.baas
            .select(PROJECTS, &Query::new().order("created_at", Order::Desc))
            .await
    }

    /// Create a project owned by the signed-in user
    pub async fn create(&self, name: &str, system_prompt: &str) -> Result<Project, ClientError> {
        let user_id = self.baas.current_user()?.id;
        let rows = self
            .baas
            .insert(
                PROJECTS,
                &[NewProject {
                    name,
                    system_prompt,
                    user_id,
                }],
            )
            .await?;
        single(rows, PROJECTS, "(new)")
    }

    pub async fn delete(&self, project_id: Uuid) -> Result<(), ClientError> {
        self.baas
            .delete(PROJECTS, &Query::new().eq("id", project_id))
            .await
    }

    pub async fn get_by_id(&self, project_id: Uuid) -> Result<Project, ClientError> {
        let rows = self
            .baas
            .select(PROJECTS, &Query::new().eq("id", project_id))
            .await?;
        single(rows, PROJECTS, project_id)
    }
}

pub struct ConversationStore<'a> {
    baas: &'a BaasClient,
}

impl ConversationStore<'_> {
    /// Start an empty conversation and return its id
    pub async fn create(&self, project_id: Uuid) -> Result<Uuid, ClientError> {
        let rows: Vec<Conversation> = self
            .baas
            .insert(
                CONVERSATIONS,
                &[NewConversation {
                    project_id,
                    title: DEFAULT_CONVERSATION_TITLE,
                }],
            )
            .await?;
        Ok(single(rows, CONVERSATIONS, "(new)")?.id)
    }

    /// Newest first
    pub async fn list(&self, project_id: Uuid) -> Result<Vec<Conversation>, ClientError> {
        self.baas
            .select(
                CONVERSATIONS,
                &Query::new()
                    .eq("project_id", project_id)
                    .order("created_at", Order::Desc),
            )
            .await
    }
}

pub struct MessageStore<'a> {
    baas: &'a BaasClient,
}

impl MessageStore<'_> {
    /// Oldest first, i.e. in reading order
    pub async fn list(&self, conversation_id: Uuid) -> Result<Vec<StoredMessage>, ClientError> {
        self.baas
            .select(
                MESSAGES,
                &Query::new()
                    .eq("conversation_id", conversation_id)
                    .order("created_at", Order::Asc),
            )
            .await
    }

    pub async fn save(
        &self,
        conversation_id: Uuid,
        role: &str,
        content: &str,
    ) -> Result<StoredMessage, ClientError> {
        let rows = self
            .baas
            .insert(
                MESSAGES,
                &[NewMessage {
                    conversation_id,
                    role,
                    content,
                }],
            )
            .await?;
        single(rows, MESSAGES, "(new)")
    }
}

pub struct FileStore<'a> {
    baas: &'a BaasClient,
}

impl FileStore<'_> {
    /// Newest first
    pub async fn list(&self, project_id: Uuid) -> Result<Vec<ProjectFile>, ClientError> {
        self.baas
            .select(
                FILES,
                &Query::new()
                    .eq("project_id", project_id)
                    .order("created_at", Order::Desc),
            )
            .await
    }

    /// Remember which provider file belongs to a project
    pub async fn record(
        &self,
        project_id: Uuid,
        filename: &str,
        openai_file_id: &str,
    ) -> Result<ProjectFile, ClientError> {
        let rows = self
            .baas
            .insert(
                FILES,
                &[NewFile {
                    project_id,
                    filename,
                    openai_file_id,
                }],
            )
            .await?;
        single(rows, FILES, "(new)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_row_deserialization() {
        let json = r#"{
            "id": "0b5c7e0a-1f7d-4d0e-9a57-3c1b9d2f8e11",
            "user_id": "8d0fd2b3-9ca7-4d9e-a95f-9e13a2d7c1a1",
            "name": "Research",
            "system_prompt": null,
            "created_at": "2025-09-22T14:03:11.123456+00:00"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.name, "Research");
        assert!(project.system_prompt.is_none());
    }

    #[test]
    fn test_new_project_row_shape() {
        let row = NewProject {
            name: "Research",
            system_prompt: "Cite sources.",
            user_id: Uuid::nil(),
        };
        let value = serde_json::to_value([row]).unwrap();
        assert_eq!(value[0]["name"], "Research");
        assert_eq!(value[0]["system_prompt"], "Cite sources.");
        assert_eq!(value[0]["user_id"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_single_reports_missing_row() {
        let err = single(Vec::<Project>::new(), PROJECTS, Uuid::nil()).unwrap_err();
        match err {
            ClientError::NotFound { table, .. } => assert_eq!(table, "projects"),
            other => panic!("Expected not found, got {:?}", other),
        }
    }
}
