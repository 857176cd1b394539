//! Backend-as-a-service client against a local mock of its auth and REST APIs

use chat_relay::auth::{AuthError, IdentityVerifier, SupabaseAuth};
use chat_relay::client::{BaasClient, ClientError, Registration, Session};
use mockito::{Matcher, Server};
use serde_json::json;
use uuid::Uuid;

const ANON_KEY: &str = "anon-key";
const USER_ID: &str = "5f3a9a5e-6d44-4c1b-8f2b-0a2d6a1c7e90";
const PROJECT_ID: &str = "0b5c7e0a-1f7d-4d0e-9a57-3c1b9d2f8e11";

fn user_json() -> serde_json::Value {
    json!({"id": USER_ID, "aud": "authenticated", "email": "me@example.com", "role": "authenticated"})
}

fn session() -> Session {
    serde_json::from_value(json!({
        "access_token": "user-jwt",
        "refresh_token": "refresh",
        "expires_in": 3600,
        "user": user_json()
    }))
    .unwrap()
}

#[tokio::test]
async fn test_login_returns_session() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .match_header("apikey", ANON_KEY)
        .match_body(Matcher::Json(json!({"email": "me@example.com", "password": "hunter22"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": "user-jwt",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh",
                "user": user_json()
            })
            .to_string(),
        )
        .create_async()
        .await;

    let baas = BaasClient::new(server.url(), ANON_KEY).unwrap();
    let session = baas.auth().login("me@example.com", "hunter22").await.unwrap();

    mock.assert_async().await;
    assert_eq!(session.access_token, "user-jwt");
    assert_eq!(session.user.id, Uuid::parse_str(USER_ID).unwrap());
    assert_eq!(session.user.email.as_deref(), Some("me@example.com"));
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
        .create_async()
        .await;

    let baas = BaasClient::new(server.url(), ANON_KEY).unwrap();
    match baas.auth().login("me@example.com", "wrong").await {
        Err(ClientError::Http { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("Invalid login credentials"));
        }
        other => panic!("Expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_pending_confirmation() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/auth/v1/signup")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json().to_string())
        .create_async()
        .await;

    let baas = BaasClient::new(server.url(), ANON_KEY).unwrap();
    match baas.auth().register("me@example.com", "hunter22").await.unwrap() {
        Registration::PendingConfirmation(user) => {
            assert_eq!(user.id, Uuid::parse_str(USER_ID).unwrap())
        }
        other => panic!("Expected pending confirmation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_projects_newest_first_with_session_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/projects")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
        ]))
        .match_header("apikey", ANON_KEY)
        .match_header("authorization", "Bearer user-jwt")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": PROJECT_ID,
                "user_id": USER_ID,
                "name": "Research",
                "system_prompt": null,
                "created_at": "2025-09-01T10:00:00+00:00"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let baas = BaasClient::new(server.url(), ANON_KEY)
        .unwrap()
        .with_session(session());
    let projects = baas.projects().list().await.unwrap();

    mock.assert_async().await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Research");
    assert_eq!(projects[0].system_prompt, None);
}

#[tokio::test]
async fn test_create_project_records_owner() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/projects")
        .match_header("prefer", "return=representation")
        .match_body(Matcher::Json(json!([{
            "name": "Research",
            "system_prompt": "Cite your sources.",
            "user_id": USER_ID
        }])))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": PROJECT_ID,
                "user_id": USER_ID,
                "name": "Research",
                "system_prompt": "Cite your sources.",
                "created_at": "2025-09-01T10:00:00.123456+00:00"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let baas = BaasClient::new(server.url(), ANON_KEY)
        .unwrap()
        .with_session(session());
    let project = baas
        .projects()
        .create("Research", "Cite your sources.")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(project.id, Uuid::parse_str(PROJECT_ID).unwrap());
    assert_eq!(project.system_prompt.as_deref(), Some("Cite your sources."));
}

#[tokio::test]
async fn test_create_project_requires_session() {
    let baas = BaasClient::new("http://127.0.0.1:9", ANON_KEY).unwrap();
    let err = baas.projects().create("Research", "").await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
}

#[tokio::test]
async fn test_get_missing_project() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/projects")
        .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{}", PROJECT_ID)))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let baas = BaasClient::new(server.url(), ANON_KEY)
        .unwrap()
        .with_session(session());
    let err = baas
        .projects()
        .get_by_id(Uuid::parse_str(PROJECT_ID).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
}

#[tokio::test]
async fn test_new_conversation_uses_default_title() {
    let conversation_id = "c7b1c1de-2a8e-4f51-9d0a-55e2f0f3a6b4";
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/rest/v1/conversations")
        .match_body(Matcher::Json(json!([{"project_id": PROJECT_ID, "title": "New Conversation"}])))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": conversation_id,
                "project_id": PROJECT_ID,
                "title": "New Conversation",
                "created_at": "2025-09-01T10:05:00+00:00"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let baas = BaasClient::new(server.url(), ANON_KEY)
        .unwrap()
        .with_session(session());
    let id = baas
        .conversations()
        .create(Uuid::parse_str(PROJECT_ID).unwrap())
        .await
        .unwrap();
    assert_eq!(id, Uuid::parse_str(conversation_id).unwrap());
}

#[tokio::test]
async fn test_messages_listed_oldest_first() {
    let conversation_id = "c7b1c1de-2a8e-4f51-9d0a-55e2f0f3a6b4";
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/messages")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("conversation_id".into(), format!("eq.{}", conversation_id)),
            Matcher::UrlEncoded("order".into(), "created_at.asc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let baas = BaasClient::new(server.url(), ANON_KEY)
        .unwrap()
        .with_session(session());
    let messages = baas
        .messages()
        .list(Uuid::parse_str(conversation_id).unwrap())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_supabase_verifier() {
    let mut server = Server::new_async().await;
    let _ok = server
        .mock("GET", "/auth/v1/user")
        .match_header("authorization", "Bearer user-jwt")
        .match_header("apikey", "service-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json().to_string())
        .create_async()
        .await;
    let _rejected = server
        .mock("GET", "/auth/v1/user")
        .match_header("authorization", "Bearer expired-jwt")
        .with_status(401)
        .with_body(r#"{"msg":"invalid JWT"}"#)
        .create_async()
        .await;

    let verifier = SupabaseAuth::new(server.url(), "service-key").unwrap();

    let user = verifier.verify("user-jwt").await.unwrap();
    assert_eq!(user.id, Uuid::parse_str(USER_ID).unwrap());

    match verifier.verify("expired-jwt").await {
        Err(AuthError::Rejected { status }) => assert_eq!(status, 401),
        other => panic!("Expected rejection, got {:?}", other),
    }
}
