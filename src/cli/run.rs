use std::sync::Arc;

use crate::assistant::Assistant;
use crate::cli::open_ledger;
use crate::error::Result;
use crate::llm::OpenAiClient;
use crate::settings::{load_secrets, load_settings};
use crate::telegram::{self, TelegramClient};

pub async fn run() -> Result<()> {
    // Missing secrets abort here, before anything starts polling.
    let secrets = load_secrets()?;
    let settings = load_settings();

    let ledger = Arc::new(open_ledger(&settings)?);
    let llm = Arc::new(OpenAiClient::new(
        secrets.openai_api_key,
        settings.model.clone(),
        settings.llm_base_url.clone(),
    )?);
    let assistant = Assistant::new(ledger, llm, settings.currency.clone(), settings.forecast_mode);
    let client = TelegramClient::new(&secrets.telegram_token, settings.poll_timeout_secs)?;

    tracing::info!(
        db = %settings.db_path().display(),
        model = %settings.model,
        forecast_mode = ?settings.forecast_mode,
        "spendbot starting"
    );
    telegram::run(client, assistant, settings.poll_timeout_secs).await
}
