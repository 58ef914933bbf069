use std::sync::Arc;

use axum::{extract::ws::WebSocketUpgrade, response::Html, routing::get, Router};
use indoc::formatdoc;
use tracing::{error, info};

use super::app::{app, AppProps, TRANSCRIPT_ID};
use super::client::HttpBackend;

/// Serves the page shell on `/` and one widget per websocket on `/ws`.
///
/// Each widget posts to `chat_endpoint` with its own HTTP client, so every
/// browser tab holds its own backend session.
pub fn router(reachable_addr: &str, chat_endpoint: &str) -> Router {
    let page = index_page(reachable_addr);
    let chat_endpoint = chat_endpoint.to_string();
    let view = dioxus_liveview::LiveViewPool::new();

    Router::new()
        .route("/", get(move || async move { Html(page) }))
        .route(
            "/ws",
            get(move |ws: WebSocketUpgrade| async move {
                ws.on_upgrade(move |socket| async move {
                    let backend = match HttpBackend::new(chat_endpoint) {
                        Ok(backend) => backend,
                        Err(err) => {
                            error!("Failed to build chat client: {err}");
                            return;
                        }
                    };
                    info!(endpoint = backend.endpoint(), "chat widget connected");
                    let props = AppProps {
                        backend: Arc::new(backend),
                    };
                    _ = view
                        .launch_with_props(dioxus_liveview::axum_socket(socket), app, props)
                        .await;
                    info!("chat widget disconnected");
                })
            }),
        )
}

fn index_page(reachable_addr: &str) -> String {
    formatdoc!(
        r#"
        <!DOCTYPE html>
        <html>
            <head>
                <title>Clinic assistant</title>
                <meta name="viewport"
                content="width=device-width,
                initial-scale=1,
                minimum-scale=1,
                maximum-scale=1,
                user-scalable=no">
            </head>
            <body>
                <div id="main"></div>
                <script>
                    new MutationObserver(function () {{
                        var transcript = document.getElementById("{transcript_id}");
                        if (transcript) {{
                            transcript.scrollTop = transcript.scrollHeight;
                        }}
                    }}).observe(document.getElementById("main"), {{
                        subtree: true,
                        childList: true,
                        attributes: true,
                        attributeFilter: ["data-scroll"],
                    }});
                </script>
            </body>
            {glue}
        </html>
        "#,
        transcript_id = TRANSCRIPT_ID,
        glue = dioxus_liveview::interpreter_glue(&format!("ws://{reachable_addr}/ws"))
    )
}
