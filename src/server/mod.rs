//! HTTP server rendering the blog pages

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::DetailRecord;
use crate::fetch::{FetchState, ListQuery};
use crate::pages;
use crate::BlogFront;

/// Server state
struct ServerState {
    front: BlogFront,
}

/// Query string of `/post`
#[derive(Debug, Deserialize)]
struct PostQuery {
    id: Option<String>,
}

/// Build the page router; unknown paths fall through to the static directory
pub fn router(front: BlogFront) -> Router {
    let static_dir = front.base_dir.join(&front.config.static_dir);
    let state = Arc::new(ServerState { front });

    Router::new()
        .route("/", get(home_handler))
        .route("/post", get(post_query_handler))
        .route("/post/:id", get(post_path_handler))
        .route("/post/:id/:slug", get(post_slug_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(front: BlogFront, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Posts API at {}", front.config.api.base_url());
    println!("Dates shown in {} time", front.client.zone());
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(front)).await?;

    Ok(())
}

async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    let fetch = state.front.posts(ListQuery::default());
    let posts = fetch.wait().await;

    let status = match posts {
        FetchState::Failed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Html(pages::home::render(&state.front.config, &posts))).into_response()
}

async fn post_query_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PostQuery>,
) -> Response {
    match query.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => render_post(&state, &id).await,
        None => (
            StatusCode::BAD_REQUEST,
            Html(pages::post::render_missing_id(&state.front.config)),
        )
            .into_response(),
    }
}

async fn post_path_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    render_post(&state, &id).await
}

/// The slug only makes links readable; lookups go by id
async fn post_slug_handler(
    State(state): State<Arc<ServerState>>,
    Path((id, _slug)): Path<(String, String)>,
) -> Response {
    render_post(&state, &id).await
}

async fn render_post(state: &ServerState, id: &str) -> Response {
    let fetch = state.front.post(id);
    let post: FetchState<DetailRecord> = fetch.wait().await;

    let status = match post {
        FetchState::Loaded(_) => StatusCode::OK,
        FetchState::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Html(pages::post::render(&state.front.config, &post))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrontConfig;
    use axum::Json;
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{}", addr)
    }

    async fn mock_api() -> u16 {
        let app = Router::new()
            .route(
                "/posts-by-date",
                get(|| async {
                    Json(json!([
                        {"id": "1", "title": "First post", "created_at": "2020-01-01"}
                    ]))
                }),
            )
            .route(
                "/posts/:id",
                get(|Path(id): Path<String>| async move {
                    if id == "1" {
                        Json(json!({
                            "id": "1",
                            "creator": "someone",
                            "title": "First post",
                            "content": "<p>Hello there</p>",
                            "tags": [],
                            "created_at": "2020-01-01T10:00:00Z"
                        }))
                        .into_response()
                    } else {
                        StatusCode::NOT_FOUND.into_response()
                    }
                }),
            );

        let base = serve(app).await;
        base.rsplit(':').next().unwrap().parse().unwrap()
    }

    async fn front_server(api_port: u16) -> String {
        let mut config = FrontConfig {
            timezone: "UTC".to_string(),
            ..FrontConfig::default()
        };
        config.api.host = "127.0.0.1".to_string();
        config.api.port = api_port;

        let dir = std::env::temp_dir();
        let front = BlogFront::from_config(config, dir).unwrap();
        serve(router(front)).await
    }

    async fn get_page(url: String) -> (u16, String) {
        let response = reqwest::get(url).await.expect("request");
        let status = response.status().as_u16();
        (status, response.text().await.expect("body"))
    }

    #[tokio::test]
    async fn test_home_lists_posts() {
        let front = front_server(mock_api().await).await;

        let (status, body) = get_page(format!("{}/", front)).await;
        assert_eq!(status, 200);
        assert!(body.contains("Found something for you"));
        assert!(body.contains(r#"href="/post/1/first-post""#));
    }

    #[tokio::test]
    async fn test_post_routes() {
        let front = front_server(mock_api().await).await;

        let (status, body) = get_page(format!("{}/post/1/first-post", front)).await;
        assert_eq!(status, 200);
        assert!(body.contains("<p>Hello there</p>"));
        assert!(body.contains("2020-01-01"));

        let (status, body) = get_page(format!("{}/post?id=1", front)).await;
        assert_eq!(status, 200);
        assert!(body.contains("First post"));

        let (status, body) = get_page(format!("{}/post?id=missing", front)).await;
        assert_eq!(status, 404);
        assert!(body.contains("Not found :/"));

        let (status, body) = get_page(format!("{}/post", front)).await;
        assert_eq!(status, 400);
        assert!(body.contains("Something wrong happened :/"));
    }

    #[tokio::test]
    async fn test_unreachable_api() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let front = front_server(port).await;

        let (status, body) = get_page(format!("{}/", front)).await;
        assert_eq!(status, 502);
        assert!(body.contains(pages::FAILED_TEXT));
    }
}
