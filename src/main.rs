use std::{error::Error, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use api::AppState;
use kb_pipeline::{HelpdeskKb, KbConfig};
use ticket_store::StoreConfig;
use tracing::{info, warn};

mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // `.env` is optional; real environment variables win.
    let dotenv = dotenvy::dotenv();

    telemetry::init()?;
    if let Err(e) = dotenv {
        warn!(error = %e, "no .env loaded; using process environment only");
    }

    let kb_cfg = KbConfig::from_env()?;
    let llm = Arc::new(LlmServiceProfiles::from_env()?);
    let store = ticket_store::connect(&StoreConfig::from_env()?).await?;

    let kb = HelpdeskKb::new(kb_cfg, llm.clone(), store.clone(), llm.clone())?;
    info!(
        filter_field = %kb.config().filter_field,
        top_k = kb.config().default_top_k,
        max_top_k = kb.config().max_top_k,
        "helpdesk KB ready"
    );

    let state = AppState {
        kb: Arc::new(kb),
        llm,
        store,
    };
    api::start(Arc::new(state)).await?;

    Ok(())
}
