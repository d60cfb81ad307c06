use std::path::Path;

use caph_engine::{Ruleset, derive};
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(path: &Path, ruleset: &Ruleset, json: bool) -> Result<(), String> {
    let sheet = super::load_sheet(path)?;
    let stats = derive(&sheet, ruleset);

    if json {
        return super::print_json(&stats);
    }

    println!("  {} [{}]", sheet.name.bold(), sheet.kind.to_string().dimmed());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Statistic", "Value"]);
    table.add_row(vec!["Health".to_string(), stats.health_max.to_string()]);
    table.add_row(vec!["Initiative".to_string(), stats.init_score.to_string()]);
    table.add_row(vec!["Defence".to_string(), stats.defence.to_string()]);
    if let Some(soak) = stats.soak {
        table.add_row(vec!["Soak".to_string(), soak.to_string()]);
    }
    if let Some(xp) = stats.xp {
        table.add_row(vec!["XP".to_string(), xp.to_string()]);
    }

    println!("{table}");
    Ok(())
}
