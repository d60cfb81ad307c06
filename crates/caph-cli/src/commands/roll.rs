use std::path::Path;

use caph_engine::{
    Attribute, RandomSource, RollOutcome, Ruleset, SkillKey, TestRequest, TestResult, perform_test,
};
use colored::Colorize;

use crate::labels;

pub fn run(
    path: &Path,
    attribute: &str,
    skill: Option<&str>,
    source: &mut dyn RandomSource,
    ruleset: &Ruleset,
    json: bool,
) -> Result<(), String> {
    let sheet = super::load_sheet(path)?;
    let attribute = attribute.parse::<Attribute>().map_err(|e| e.to_string())?;

    let request = match skill {
        Some(skill) => {
            let key = skill.parse::<SkillKey>().map_err(|e| e.to_string())?;
            if labels::skill(&key).is_none() {
                tracing::warn!(skill = %key, "skill is not in the label table");
            }
            TestRequest::skill(attribute, key)
        }
        None => TestRequest::attribute(attribute),
    };

    let result = perform_test(ruleset, &sheet, &request, source).map_err(|e| e.to_string())?;

    if json {
        return super::print_json(&result);
    }

    println!("  {} {}", sheet.name.bold(), flavor(&result).dimmed());
    println!("  pool:    {}", result.pool);
    if result.pool.is_dragon_only() {
        println!("  {}", "skill exhausted: rolling dragon dice only".yellow());
    }

    if result.is_auto_fail() {
        println!("  result:  {}", "no dice to roll (automatic failure)".red().bold());
        return Ok(());
    }

    println!("  dice:    {}", describe(&result.outcome));
    println!("  total:   {}", result.outcome.total.to_string().bold());
    Ok(())
}

/// `Physical + Athletics | unskilled`, with labels from the table.
fn flavor(result: &TestResult) -> String {
    let attribute = labels::attribute(result.attribute);
    match &result.skill {
        Some(key) => format!("{attribute} + {} | {}", labels::skill_or_key(key), result.category),
        None => format!("{attribute} | {}", result.category),
    }
}

/// List the dice, marking exploded dragon dice.
fn describe(outcome: &RollOutcome) -> String {
    let mut parts = Vec::new();
    let plain = outcome.plain_faces();
    if !plain.is_empty() {
        let faces: Vec<String> = plain.iter().map(u32::to_string).collect();
        parts.push(format!("[{}]", faces.join(", ")));
    }
    for die in outcome.dragon_dice() {
        let chain: Vec<String> = die.chain.iter().map(u32::to_string).collect();
        let text = format!("{} [{}]", die.kind, chain.join(", "));
        if die.exploded {
            parts.push(text.yellow().bold().to_string());
        } else {
            parts.push(text);
        }
    }
    parts.join(" + ")
}
