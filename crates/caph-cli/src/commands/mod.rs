pub mod check;
pub mod derive;
pub mod heroism;
pub mod initiative;
pub mod roll;

use std::path::Path;

use caph_engine::rules::preset;
use caph_engine::{CharacterSheet, RandomSource, Ruleset, ScriptedSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

/// Pick the ruleset: an explicit file, a named preset, or the standard rules.
pub fn load_ruleset(path: Option<&Path>, preset_name: Option<&str>) -> Result<Ruleset, String> {
    let ruleset = match (path, preset_name) {
        (Some(path), _) => Ruleset::from_path(path).map_err(|e| e.to_string())?,
        (None, Some(name)) => preset::by_name(name)
            .ok_or_else(|| format!("unknown preset '{name}' (expected standard or legacy)"))?,
        (None, None) => preset::standard(),
    };
    debug!(ruleset = %ruleset.name, "loaded ruleset");
    Ok(ruleset)
}

/// Read a character sheet, naming the file in any error.
fn load_sheet(path: &Path) -> Result<CharacterSheet, String> {
    CharacterSheet::from_path(path).map_err(|e| e.to_string())
}

/// The dice to roll with: replayed faces, a seeded RNG, or one seeded from the OS.
pub fn make_source(seed: Option<u64>, faces: &[u32]) -> Box<dyn RandomSource> {
    if !faces.is_empty() {
        debug!(faces = faces.len(), "replaying recorded faces");
        return Box::new(ScriptedSource::new(faces.iter().copied()));
    }
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_os_rng()),
    }
}

/// Print a value as pretty JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
