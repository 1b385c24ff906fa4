use std::sync::Arc;

use crate::assistant::{Assistant, Command};
use crate::cli::{model_from_env, open_ledger};
use crate::error::Result;
use crate::settings::load_settings;

/// Run `/advice` or `/forecast` locally and print the reply. Errors are
/// returned as-is rather than turned into chat messages.
pub async fn run(command: Command) -> Result<()> {
    let settings = load_settings();
    let ledger = Arc::new(open_ledger(&settings)?);
    let llm = model_from_env(&settings)?;
    let assistant = Assistant::new(ledger, llm, settings.currency.clone(), settings.forecast_mode);

    let reply = assistant.run(command).await?;
    println!("{}", reply.text);
    Ok(())
}
