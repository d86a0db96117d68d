use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned money cell; `None` is displayed as a grey "-".
pub fn money_cell(value: Option<f64>) -> Cell {
    value.map_or(
        Cell::new("-")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format!("${v:.2}")).set_alignment(CellAlignment::Right),
    )
}

/// Right-aligned decimal cell for rates and risk scores.
pub fn number_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.4}")).set_alignment(CellAlignment::Right)
}

/// Creates a cell for a gain over principal, green when positive.
pub fn gain_cell(gain: f64) -> Cell {
    let text = format!("{gain:+.2}");
    let color = if gain > 0.0 {
        Color::Green
    } else if gain < 0.0 {
        Color::Red
    } else {
        Color::DarkGrey
    };
    Cell::new(text)
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
