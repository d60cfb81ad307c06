use std::path::PathBuf;

use caph_engine::validate::ValidationIssue;
use caph_engine::{Ruleset, validate_ruleset, validate_sheet};
use colored::Colorize;

use crate::labels;

pub fn run(paths: &[PathBuf], ruleset: &Ruleset) -> Result<(), String> {
    let mut issues = validate_ruleset(ruleset);

    for path in paths {
        let sheet = super::load_sheet(path)?;
        issues.extend(validate_sheet(&sheet));

        for (key, _) in sheet.skill_entries() {
            if labels::skill(&key).is_some() {
                continue;
            }
            let message = match labels::figure_label(&key.figure) {
                Some(figure) => format!("skill '{key}' is not a {figure} skill"),
                None => format!("figure '{}' is unknown", key.figure),
            };
            issues.push(ValidationIssue {
                subject: sheet.name.clone(),
                message,
                is_error: false,
            });
        }
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;

    for issue in &issues {
        if issue.is_error {
            eprintln!("  {} {}: {}", "error".red().bold(), issue.subject, issue.message);
        } else {
            eprintln!("  {} {}: {}", "warning".yellow().bold(), issue.subject, issue.message);
        }
    }

    if errors > 0 {
        return Err(format!("{errors} error(s), {warnings} warning(s)"));
    }

    if warnings > 0 {
        println!("  {} ({warnings} warning(s))", "All checks passed".green());
    } else {
        println!("  {}", "All checks passed".green());
    }
    Ok(())
}
