use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::chart;
use crate::cli::open_ledger;
use crate::error::Result;
use crate::fmt::money_grouped;
use crate::reports::{self, Aggregate, Window};
use crate::settings::load_settings;

fn heading(window: Window) -> &'static str {
    match window {
        Window::All => "Spending (all time)",
        Window::Week => "Spending (last 7 days)",
        Window::Month => "Spending (last 30 days)",
    }
}

pub fn format_table(agg: &Aggregate, window: Window, currency: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", "Count"]);
    for item in &agg.categories {
        table.add_row(vec![
            Cell::new(&item.category),
            Cell::new(money_grouped(item.total, currency)),
            Cell::new(format!("{:.1}%", agg.share(item))),
            Cell::new(item.count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money_grouped(agg.total, currency)),
        Cell::new(""),
        Cell::new(agg.count),
    ]);
    format!("{}\n{table}", heading(window))
}

pub fn run(window: Window, chart_path: Option<String>) -> Result<()> {
    let settings = load_settings();
    let ledger = open_ledger(&settings)?;
    let entries = reports::load(&ledger, window)?;

    let Some(agg) = reports::aggregate(&entries) else {
        println!("{}: no expenses recorded.", heading(window));
        return Ok(());
    };

    println!("{}", format_table(&agg, window, &settings.currency));

    if let Some(path) = chart_path {
        match chart::render_pie(&agg)? {
            Some(c) => {
                std::fs::write(&path, &c.png)?;
                println!("\nChart saved to {path}\n{}", c.legend);
            }
            None => println!("\nNothing to chart."),
        }
    }
    Ok(())
}
