// Route definitions

use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;
use warp::Filter;

use crate::auth::with_auth;
use crate::error::handle_rejection;
use crate::handlers;
use crate::models::{ChatRequest, UploadRequest};
use crate::state::AppState;

/// Largest accepted JSON body; uploads arrive base64-encoded inside it
pub const MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

/// All routes, with error recovery inside CORS so error replies carry the
/// CORS headers too
pub fn configure_routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let api = warp::path("api");
    let auth = with_auth(state.verifier.clone());

    // POST /api/chat
    let chat = api
        .and(warp::path("chat"))
        .and(warp::path::end())
        .and(warp::post())
        .and(auth.clone())
        .and(json_body::<ChatRequest>())
        .and(with_state(state.clone()))
        .and_then(handlers::chat_handler);

    // POST /api/upload
    let upload = api
        .and(warp::path("upload"))
        .and(warp::path::end())
        .and(warp::post())
        .and(auth.clone())
        .and(json_body::<UploadRequest>())
        .and(with_state(state.clone()))
        .and_then(handlers::upload_handler);

    // GET /api/file/{id}
    let get_file = api
        .and(warp::path("file"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(auth)
        .and(with_state(state.clone()))
        .and_then(handlers::get_file_handler);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["authorization", "content-type"])
        .allow_methods(vec!["GET", "POST"]);

    let log = warp::log::custom(|info| {
        tracing::info!(
            method = %info.method(),
            path = info.path(),
            status = info.status().as_u16(),
            elapsed_ms = info.elapsed().as_millis() as u64,
            "request"
        );
    });

    chat.or(upload)
        .or(get_file)
        .or(static_pages(&state.public_dir))
        .recover(handle_rejection)
        .with(cors)
        .with(log)
}

/// `/`, `/dashboard` and `/chat` pages plus any other file under the public directory
fn static_pages(
    public_dir: &Path,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let index = warp::get()
        .and(warp::path::end())
        .and(warp::fs::file(public_dir.join("index.html")));

    let dashboard = warp::get()
        .and(warp::path("dashboard"))
        .and(warp::path::end())
        .and(warp::fs::file(public_dir.join("dashboard.html")));

    let chat = warp::get()
        .and(warp::path("chat"))
        .and(warp::path::end())
        .and(warp::fs::file(public_dir.join("chat.html")));

    let assets = warp::get().and(warp::fs::dir(public_dir.to_path_buf()));

    index.or(dashboard).or(chat).or(assets)
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
