pub mod add;
pub mod ask;
pub mod backup;
pub mod init;
pub mod report;
pub mod reset;
pub mod run;
pub mod status;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::ledger::SqliteLedger;
use crate::llm::{Completion, NoModel, OpenAiClient};
use crate::settings::{load_openai_key, Settings};

/// Open the configured ledger, creating the data directory if needed.
pub(crate) fn open_ledger(settings: &Settings) -> Result<SqliteLedger> {
    std::fs::create_dir_all(&settings.data_dir)?;
    SqliteLedger::open(&settings.db_path())
}

/// Model client from settings plus `OPENAI_API_KEY`, or `NoModel` when the
/// key is absent.
pub(crate) fn model_from_env(settings: &Settings) -> Result<Arc<dyn Completion>> {
    match load_openai_key() {
        Ok(key) => Ok(Arc::new(OpenAiClient::new(
            key,
            settings.model.clone(),
            settings.llm_base_url.clone(),
        )?)),
        Err(_) => Ok(Arc::new(NoModel)),
    }
}

#[derive(Parser)]
#[command(name = "spendbot", about = "Chat bot that records and reports on everyday spending.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the ledger.
    Init {
        /// Path for spendbot data (default: ~/Documents/spendbot)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Start the Telegram bot (needs TELEGRAM_TOKEN and OPENAI_API_KEY).
    Run,
    /// Record an expense from free text, e.g. `spendbot add такси 1500`.
    Add {
        /// Free-text description containing the amount
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// All-time spending by category.
    Stats {
        /// Also write a pie chart PNG to this path
        #[arg(long)]
        chart: Option<String>,
    },
    /// Spending over the last 7 days.
    Week {
        /// Also write a pie chart PNG to this path
        #[arg(long)]
        chart: Option<String>,
    },
    /// Spending over the last 30 days.
    Month {
        /// Also write a pie chart PNG to this path
        #[arg(long)]
        chart: Option<String>,
    },
    /// Ask the model for savings advice.
    Advice,
    /// Forecast next month's spending (mode set in settings.json).
    Forecast,
    /// Delete every recorded expense.
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the ledger location and record count.
    Status,
    /// Back up the ledger.
    Backup {
        /// Output path (default: <data_dir>/backups/expenses-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
}
