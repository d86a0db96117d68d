use super::ui;
use crate::core::config::AppConfig;
use crate::core::simulation::{StrategyQuote, compare_strategies};
use anyhow::Result;
use comfy_table::Cell;

pub const DEFAULT_AMOUNT: f64 = 1000.0;

fn display_quotes(quotes: &[StrategyQuote], amount: f64) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Strategy"),
        ui::header_cell("Risk Rating"),
        ui::header_cell("Risk"),
        ui::header_cell("Invested"),
        ui::header_cell("Gain"),
        ui::header_cell("Potential Return"),
    ]);

    for quote in quotes {
        table.add_row(vec![
            Cell::new(&quote.id),
            Cell::new(format!("{} ({})", quote.name, quote.kind)),
            ui::number_cell(quote.risk_rating),
            ui::number_cell(quote.risk),
            ui::money_cell(Some(quote.invested)),
            ui::gain_cell(quote.invested - amount),
            ui::money_cell(Some(quote.potential_return)),
        ]);
    }

    let mut output = format!(
        "Strategies for {}\n\n",
        ui::style_text(&format!("${amount:.2}"), ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    for quote in quotes {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(&quote.details, ui::StyleType::Subtle)
        ));
    }
    output
}

pub fn run(config: &AppConfig, amount: f64) -> Result<()> {
    if config.strategies.is_empty() {
        println!("No strategies configured.");
        return Ok(());
    }

    let quotes = compare_strategies(config, amount)?;
    println!("{}", display_quotes(&quotes, amount));
    Ok(())
}
