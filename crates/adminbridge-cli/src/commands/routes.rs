use adminbridge_core::{AdminBridge, RouteEntry};
use anyhow::{Result, bail};
use comfy_table::{Cell, Table};

use crate::output::{OutputFormat, json::print_json, table::print_table};

pub async fn run(bridge: &AdminBridge, flat: bool, format: OutputFormat) -> Result<()> {
    if !bridge.state().is_authenticated() {
        bail!("Not signed in");
    }

    // The table lives in memory; a fresh process rebuilds it from the menus.
    if bridge.routes.routes().is_empty() {
        let profile = bridge.profile.ensure().await?;
        bridge.routes.rebuild(&profile).await?;
    }

    if format.is_json() {
        return if flat {
            print_json(&bridge.routes.flatten())
        } else {
            print_json(&bridge.routes.routes())
        };
    }

    let mut table = Table::new();
    table.set_header(vec!["Path", "Title", "Component", "Hidden"]);
    if flat {
        for entry in bridge.routes.flatten() {
            add_row(&mut table, &entry, 0);
        }
    } else {
        for entry in bridge.routes.routes() {
            add_tree(&mut table, &entry, 0);
        }
    }
    print_table(table)
}

fn add_tree(table: &mut Table, entry: &RouteEntry, depth: usize) {
    add_row(table, entry, depth);
    for child in &entry.children {
        add_tree(table, child, depth + 1);
    }
}

fn add_row(table: &mut Table, entry: &RouteEntry, depth: usize) {
    table.add_row(vec![
        Cell::new(format!("{}{}", "  ".repeat(depth), entry.path)),
        Cell::new(&entry.meta.title),
        Cell::new(entry.component.as_deref().unwrap_or("")),
        Cell::new(if entry.meta.is_hide { "yes" } else { "" }),
    ]);
}
