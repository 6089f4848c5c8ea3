use adminbridge_core::AdminBridge;
use anyhow::{Result, anyhow};
use comfy_table::{Cell, Table};
use serde_json::Value;

use crate::output::{OutputFormat, json::print_json, table::print_table};

pub async fn run(bridge: &AdminBridge, dict_type: Option<String>, format: OutputFormat) -> Result<()> {
    let dictionary = bridge.lookup.ensure().await?;

    if let Some(dict_type) = dict_type {
        let record = dictionary
            .find_by_type(&dict_type)
            .ok_or_else(|| anyhow!("Dictionary type not found: {}", dict_type))?;
        return print_json(record);
    }

    if format.is_json() {
        return print_json(&dictionary);
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "Name", "Status"]);
    for record in dictionary.records() {
        table.add_row(vec![
            Cell::new(text(record, "id")),
            Cell::new(text(record, "dict_type")),
            Cell::new(text(record, "name")),
            Cell::new(text(record, "status")),
        ]);
    }
    print_table(table)
}

fn text(record: &Value, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
