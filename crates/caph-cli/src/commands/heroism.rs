use std::fs;
use std::path::Path;

use colored::Colorize;

pub fn run(path: &Path, write: bool) -> Result<(), String> {
    let mut sheet = super::load_sheet(path)?;
    let notice = sheet.reset_heroism().map_err(|e| e.to_string())?;

    println!("  {}", notice.to_string().bold());
    println!(
        "  heroism: {} -> {}",
        format!("{}/{}", notice.previous.value, notice.previous.max).dimmed(),
        format!("{}/{}", notice.heroism.value, notice.heroism.max).green()
    );

    if write {
        let json = sheet.to_json().map_err(|e| e.to_string())?;
        fs::write(path, json + "\n")
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        println!("  Saved to {}", path.display());
    }

    Ok(())
}
