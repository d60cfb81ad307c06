use std::path::{Path, PathBuf};

use caph_engine::{Combat, Combatant, RandomSource, Ruleset};
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(
    paths: &[PathBuf],
    defeated: &[String],
    source: &mut dyn RandomSource,
    ruleset: &Ruleset,
    json: bool,
) -> Result<(), String> {
    let mut combat = Combat::new();
    for path in paths {
        let sheet = super::load_sheet(path)?;
        let combatant = Combatant::from_sheet(combatant_id(path)?, &sheet, ruleset);
        combat.add_combatant(combatant).map_err(|e| e.to_string())?;
    }
    for id in defeated {
        combat.defeat(id).map_err(|e| e.to_string())?;
    }

    let batch = combat
        .start_round(ruleset, source)
        .map_err(|e| e.to_string())?;

    if json {
        return super::print_json(&batch);
    }

    println!("  {} {}", "Round".bold(), combat.current_round());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Combatant", "Score", "Roll", "Initiative"]);

    for (position, combatant) in combat.turn_order().iter().enumerate() {
        let update = batch.updates.iter().find(|u| u.id == combatant.id);
        let roll = update.map_or_else(|| "-".to_string(), |u| u.roll.to_string());
        let initiative = match update {
            Some(u) if u.capped => format!("{} (capped)", u.initiative),
            Some(u) => u.initiative.to_string(),
            None => "-".to_string(),
        };
        table.add_row(vec![
            (position + 1).to_string(),
            combatant.name.clone(),
            combatant.init_score.to_string(),
            roll,
            initiative,
        ]);
    }

    println!("{table}");

    let fallen: Vec<&str> = combat
        .combatants
        .iter()
        .filter(|c| c.defeated)
        .map(|c| c.name.as_str())
        .collect();
    if !fallen.is_empty() {
        println!();
        println!("  {} {}", "Defeated:".dimmed(), fallen.join(", "));
    }

    Ok(())
}

/// A combatant's id is the sheet's file stem.
fn combatant_id(path: &Path) -> Result<String, String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| format!("cannot derive a combatant id from {}", path.display()))
}
