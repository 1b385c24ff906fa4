use std::sync::Arc;

use crate::assistant::Assistant;
use crate::categorizer::Source;
use crate::cli::{model_from_env, open_ledger};
use crate::error::Result;
use crate::fmt::money_grouped;
use crate::settings::load_settings;

pub async fn run(text: &[String]) -> Result<()> {
    let settings = load_settings();
    let ledger = Arc::new(open_ledger(&settings)?);
    let llm = model_from_env(&settings)?;
    let assistant = Assistant::new(ledger, llm, settings.currency.clone(), settings.forecast_mode);

    let recorded = assistant.add_expense(&text.join(" ")).await?;
    let how = match recorded.source {
        Source::Keyword => "keyword",
        Source::Model => "model",
    };
    println!(
        "Recorded #{}: {} as {} (by {how})",
        recorded.id,
        money_grouped(recorded.amount, &settings.currency),
        recorded.category
    );
    Ok(())
}
