use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing::info;

use crate::chat_core::{self, AppointmentStore, Assistant, OpenAiModel};
use crate::config::Settings;
use crate::frontend::server_liveview;

pub fn router(settings: &Settings, assistant: Arc<Assistant>) -> Router {
    Router::new()
        .merge(server_liveview::router(
            &settings.reachable_addr,
            &settings.chat_endpoint,
        ))
        .merge(chat_core::routes::router(assistant))
}

pub async fn start_server(settings: Settings) -> Result<()> {
    let store = AppointmentStore::connect(&settings.database_url)?;
    let model = Arc::new(OpenAiModel::new(settings.openai_model.as_str()));
    let assistant = Arc::new(Assistant::new(model, store));
    let app = router(&settings, assistant);

    info!("Listening on http://{}", settings.listen_addr);

    axum::Server::bind(&settings.listen_addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
