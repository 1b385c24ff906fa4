use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::fmt::format_bytes;
use crate::ledger::SqliteLedger;
use crate::settings::load_settings;

pub fn run(output: Option<String>) -> Result<()> {
    let settings = load_settings();
    if !settings.db_path().exists() {
        return Err(AppError::Settings(format!(
            "No ledger at {}\nRun `spendbot init` first.",
            settings.db_path().display()
        )));
    }
    let ledger = SqliteLedger::open(&settings.db_path())?;

    let target = match output {
        Some(p) => PathBuf::from(p),
        None => {
            std::fs::create_dir_all(settings.backups_dir())?;
            settings.backup_path(chrono::Local::now())
        }
    };
    ledger.backup_to(&target)?;

    println!(
        "Backed up {} expenses to {} ({})",
        ledger.count()?,
        target.display(),
        format_bytes(std::fs::metadata(&target)?.len())
    );
    Ok(())
}
