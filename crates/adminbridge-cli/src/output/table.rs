use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn print_table(table: Table) -> Result<()> {
    println!("{table}");
    Ok(())
}

/// Two-column key/value table.
pub fn print_fields(rows: &[(&str, String)]) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    print_table(table)
}
