use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn status_cell(succeeded: bool) -> Cell {
    if succeeded {
        Cell::new("PASSED").fg(TableColor::Green)
    } else {
        Cell::new("FAILED").fg(TableColor::Red)
    }
}

pub fn failed_count_cell(failed: usize) -> Cell {
    if failed == 0 {
        Cell::new(failed).fg(TableColor::Green)
    } else {
        Cell::new(failed).fg(TableColor::Red)
    }
}

pub fn flaky_count_cell(flaky: usize) -> Cell {
    if flaky == 0 {
        Cell::new(flaky).fg(TableColor::Green)
    } else {
        Cell::new(flaky).fg(TableColor::Yellow)
    }
}
