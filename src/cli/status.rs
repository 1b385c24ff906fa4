use crate::cli::open_ledger;
use crate::error::Result;
use crate::fmt::{format_bytes, money_grouped};
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Model:      {}", settings.model);
    println!("Forecast:   {:?}", settings.forecast_mode);

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `spendbot init` to set up.");
        return Ok(());
    }

    let size = std::fs::metadata(&db_path)?.len();
    println!("DB size:    {}", format_bytes(size));

    let ledger = open_ledger(&settings)?;
    println!();
    println!("Expenses:   {}", ledger.count()?);

    let recent = ledger.recent(5)?;
    if !recent.is_empty() {
        println!();
        println!("Latest:");
        for t in &recent {
            println!(
                "  #{:<5} {}  {:<14} {}",
                t.id,
                t.date,
                t.category,
                money_grouped(t.amount, &settings.currency)
            );
        }
    }
    Ok(())
}
