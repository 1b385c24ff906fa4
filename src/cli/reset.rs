use std::io::Write;

use crate::cli::open_ledger;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::settings::load_settings;

pub fn run(yes: bool) -> Result<()> {
    let settings = load_settings();
    let ledger = open_ledger(&settings)?;

    if !yes {
        print!(
            "Delete every expense in {}? Type 'yes' to confirm: ",
            settings.db_path().display()
        );
        std::io::stdout().flush()?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if input.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let removed = ledger.clear()?;
    tracing::info!(removed, "ledger cleared from cli");
    println!("Deleted {removed} expenses.");
    Ok(())
}
