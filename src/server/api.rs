use crate::config::TlsPaths;
use crate::gateway::{ ChatGateway, GatewayError };
use crate::models::chat::{ ChatReply, ChatRequest };
use std::error::Error;
use std::net::SocketAddr;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::State,
    response::{ Html, IntoResponse },
};
use serde::Serialize;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error };

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Clone)]
pub struct AppState {
    pub gateway: ChatGateway,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn serve_http(
    addr: SocketAddr,
    state: AppState,
    tls: Option<TlsPaths>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(state);

    if let Some(tls) = tls {
        info!(
            "TLS enabled. Loading certificate from '{}' and key from '{}'",
            tls.cert_path,
            tls.key_path
        );
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            &tls.cert_path,
            &tls.key_path
        ).await?;

        info!("Chat gateway listening on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;

        info!("Chat gateway listening on: http://{}", addr);
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal()).await?;
    }

    info!("Chat gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>
) -> Result<Json<ChatReply>, GatewayError> {
    info!("Chat request with {} message(s)", req.messages.len());
    let message = state.gateway.respond(&req.messages).await?;
    Ok(Json(ChatReply::Message { message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::{ gateway, Scripted };
    use crate::gateway::{ EMPTY_CONVERSATION_MESSAGE, GENERATION_PLACEHOLDER, INTERNAL_MESSAGE, UNAVAILABLE_MESSAGE };
    use axum::body::Body;
    use axum::http::{ header, Request, StatusCode };
    use serde_json::{ json, Value };
    use tower::ServiceExt;

    fn app(primary: Scripted, fallback: Scripted) -> Router {
        let (gateway, _, _) = gateway(primary, fallback);
        router(AppState { gateway })
    }

    async fn post_chat(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap()
            ).await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn hello() -> Value {
        json!({ "messages": [{ "role": "user", "content": "hello" }] })
    }

    #[tokio::test]
    async fn chat_returns_message_from_primary() {
        let app = app(Scripted::Body(json!([{ "generated_text": "X" }])), Scripted::Status(500));
        let (status, body) = post_chat(app, "/api/chat", hello()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "X" }));
    }

    #[tokio::test]
    async fn short_route_is_an_alias() {
        let app = app(Scripted::Body(json!({ "generated_text": "X" })), Scripted::Status(500));
        let (status, body) = post_chat(app, "/chat", hello()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "X" }));
    }

    #[tokio::test]
    async fn placeholder_when_primary_shape_unknown() {
        let app = app(Scripted::Body(json!({ "warnings": [] })), Scripted::Status(500));
        let (_, body) = post_chat(app, "/api/chat", hello()).await;
        assert_eq!(body, json!({ "message": GENERATION_PLACEHOLDER }));
    }

    #[tokio::test]
    async fn exhausted_upstreams_answer_503() {
        let app = app(Scripted::Status(429), Scripted::Status(503));
        let (status, body) = post_chat(app, "/api/chat", hello()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": UNAVAILABLE_MESSAGE }));
    }

    #[tokio::test]
    async fn internal_failure_answers_500() {
        let app = app(Scripted::BadJson, Scripted::Status(500));
        let (status, body) = post_chat(app, "/api/chat", hello()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": INTERNAL_MESSAGE }));
    }

    #[tokio::test]
    async fn empty_conversation_answers_400() {
        let app = app(Scripted::Status(500), Scripted::Status(500));
        let (status, body) = post_chat(app, "/api/chat", json!({ "messages": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": EMPTY_CONVERSATION_MESSAGE }));
    }

    #[tokio::test]
    async fn missing_messages_field_is_rejected() {
        let app = app(Scripted::Status(500), Scripted::Status(500));
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"prompt":"hi"}"#))
                    .unwrap()
            ).await
            .unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn index_and_health_are_served() {
        let app = app(Scripted::Status(500), Scripted::Status(500));
        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/chat"));

        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
