use super::ui;
use crate::core::config::AppConfig;
use crate::core::simulation::{SimulationReport, run_scenario};
use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    /// Also write the plain transcript to this file.
    pub output: Option<PathBuf>,
    /// Print the report as JSON instead of tables.
    pub json: bool,
}

impl SimulationReport {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("#"),
            ui::header_cell("Action"),
            ui::header_cell("Details"),
            ui::header_cell("Result"),
            ui::header_cell("Balance"),
        ]);

        for outcome in &self.outcomes {
            table.add_row(vec![
                Cell::new(outcome.index).set_alignment(CellAlignment::Right),
                Cell::new(outcome.action),
                Cell::new(&outcome.message),
                ui::money_cell(outcome.value),
                ui::money_cell(Some(outcome.balance)),
            ]);
        }

        let mut output = format!(
            "Bank: {}\n{}\n\n",
            ui::style_text(&self.bank_name, ui::StyleType::Title),
            ui::style_text(&self.initial_details, ui::StyleType::Subtle)
        );
        output.push_str(&table.to_string());

        if let Some(error) = &self.error {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(&format!("Investment error: {error}"), ui::StyleType::Error)
            ));
        }

        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Final Funds", ui::StyleType::TotalLabel),
            ui::style_text(&format!("${:.2}", self.final_funds), ui::StyleType::TotalValue)
        ));

        output
    }
}

pub fn run(config: &AppConfig, options: &SimulateOptions) -> Result<()> {
    let report = run_scenario(config)?;

    if let Some(path) = &options.output {
        std::fs::write(path, report.transcript())
            .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
        info!("Wrote transcript to {}", path.display());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.display_as_table());
        ui::print_separator();
        println!("{}", report.final_details);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCENARIO: &str = r#"
bank:
  name: "Table Bank"
  initial_funds: 1000.0
strategies:
  - id: cash
    kind: base
    name: "Cash"
steps:
  - use: cash
  - invest: 400.0
  - invest: 900.0
"#;

    #[test]
    fn test_display_as_table() {
        let config = AppConfig::from_yaml(SCENARIO).unwrap();
        let report = run_scenario(&config).unwrap();
        let rendered = console::strip_ansi_codes(&report.display_as_table()).to_string();

        assert!(rendered.contains("Table Bank"));
        assert!(rendered.contains("Switched"));
        assert!(rendered.contains("$400.00"));
        assert!(rendered.contains("$600.00"));
        assert!(rendered.contains("Investment error: step 3 (invest)"));
        assert!(rendered.contains("Final Funds: $600.00"));
    }

    #[test]
    fn test_run_writes_transcript() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let output = temp_dir.path().join("demo.txt");
        let config = AppConfig::from_yaml(SCENARIO)?;

        run(
            &config,
            &SimulateOptions {
                output: Some(output.clone()),
                json: true,
            },
        )?;

        let transcript = std::fs::read_to_string(&output)?;
        assert!(transcript.starts_with("Initial Bank Details:"));
        assert!(transcript.contains("2. [invest]"));
        assert!(transcript.contains("Investment error: step 3 (invest): Insufficient funds"));
        Ok(())
    }
}
