use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use {
    anyhow::Context,
    axum::{
        Router,
        body::Bytes,
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    },
    axum_server::{Handle, tls_rustls::RustlsConfig},
    pttbot_config::{RunMode, ServerConfig},
    pttbot_line::{SIGNATURE_HEADER, parse_request},
    tower_http::trace::TraceLayer,
    tracing::{error, info, warn},
};

use crate::{dispatch::dispatch_events, state::AppState};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/callback", post(callback))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Replies are sent before the webhook is acknowledged.
async fn callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let events = match parse_request(state.channel_secret(), signature, &body) {
        Ok(events) => events,
        Err(e) if e.is_invalid_signature() => {
            warn!("rejected callback with invalid signature");
            return StatusCode::BAD_REQUEST;
        },
        Err(e) => {
            error!(error = %e, "failed to parse callback");
            return StatusCode::INTERNAL_SERVER_ERROR;
        },
    };
    dispatch_events(&state, events).await;
    StatusCode::OK
}

async fn healthz() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

/// Serve `app` in the configured run mode until ctrl-c.
pub async fn serve(config: &ServerConfig, app: Router) -> anyhow::Result<()> {
    let ip: IpAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.bind))?;
    let addr = SocketAddr::new(ip, config.port);
    info!(%addr, mode = %config.mode, "starting server");

    match config.mode {
        RunMode::Http => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            info!(%addr, "listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        },
        RunMode::Https => {
            let tls = RustlsConfig::from_pem_file(&config.tls_cert_path, &config.tls_key_path)
                .await
                .with_context(|| {
                    format!(
                        "failed to load TLS material from {} and {}",
                        config.tls_cert_path.display(),
                        config.tls_key_path.display()
                    )
                })?;
            let handle = Handle::new();
            tokio::spawn({
                let handle = handle.clone();
                async move {
                    shutdown_signal().await;
                    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                }
            });
            info!(%addr, "secure listening");
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        },
    }
    info!("server stopped");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_support::{RecordingMessenger, SECRET, article, state_with},
        axum::{body::Body, http::Request},
        pttbot_common::ReplyTemplate,
        pttbot_line::{OutboundMessage, sign},
        tower::ServiceExt,
    };

    fn callback_request(body: &str, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/callback");
        if let Some(signature) = signature {
            builder = builder.header(SIGNATURE_HEADER, signature);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn postback_body(token: &str, data: &str) -> String {
        format!(
            r#"{{"destination":"Ubot","events":[{{"type":"postback","replyToken":"{token}","source":{{"type":"user","userId":"U1"}},"postback":{{"data":"{data}"}}}}]}}"#
        )
    }

    #[tokio::test]
    async fn signed_postback_is_answered() {
        let messenger = Arc::new(RecordingMessenger::default());
        let app = build_router(Arc::new(state_with(
            messenger.clone(),
            vec![article("M.123", 15)],
        )));
        let body = postback_body("r1", "action=ShowAllImages&article_id=M.123");
        let signature = sign(SECRET, body.as_bytes()).unwrap();

        let resp = app
            .oneshot(callback_request(&body, Some(signature)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        let OutboundMessage::Template {
            template: ReplyTemplate::ImageCarousel(carousel),
            ..
        } = &sent[0].1[0]
        else {
            panic!("expected image carousel");
        };
        assert_eq!(carousel.columns().len(), 10);
    }

    #[tokio::test]
    async fn bad_signature_is_400() {
        let messenger = Arc::new(RecordingMessenger::default());
        let app = build_router(Arc::new(state_with(messenger.clone(), vec![])));
        let body = postback_body("r1", "action=Help");
        let forged = sign("not-the-secret", body.as_bytes()).unwrap();

        let resp = app
            .clone()
            .oneshot(callback_request(&body, Some(forged)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = app.oneshot(callback_request(&body, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_500() {
        let messenger = Arc::new(RecordingMessenger::default());
        let app = build_router(Arc::new(state_with(messenger, vec![])));
        let body = "{\"events\": 12}";
        let signature = sign(SECRET, body.as_bytes()).unwrap();

        let resp = app
            .oneshot(callback_request(body, Some(signature)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn empty_event_list_is_200() {
        let messenger = Arc::new(RecordingMessenger::default());
        let app = build_router(Arc::new(state_with(messenger.clone(), vec![])));
        let body = r#"{"destination":"Ubot","events":[]}"#;
        let signature = sign(SECRET, body.as_bytes()).unwrap();

        let resp = app
            .oneshot(callback_request(body, Some(signature)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let app = build_router(Arc::new(state_with(
            Arc::new(RecordingMessenger::default()),
            vec![],
        )));
        let resp = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }
}
