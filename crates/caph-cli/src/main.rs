//! CLI frontend for the dragon-dice resolution engine.

mod commands;
mod labels;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "caph",
    about = "Dragon-dice task resolution and initiative from the command line",
    version,
    propagate_version = true
)]
struct Cli {
    /// Ruleset JSON file (default: the standard rules)
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    /// Named ruleset preset (standard, legacy)
    #[arg(short, long, global = true, conflicts_with = "rules")]
    preset: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the derived statistics of a character
    Derive {
        /// Character sheet (JSON)
        sheet: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Roll an attribute or skill test
    Roll {
        /// Character sheet (JSON)
        sheet: PathBuf,

        /// Attribute to test (physical, agility, fortitude, reasoning, social)
        attribute: String,

        /// Skill to add, as figure/skill (e.g. adventurer/athletics)
        #[arg(short, long)]
        skill: Option<String>,

        /// RNG seed for a reproducible roll
        #[arg(long)]
        seed: Option<u64>,

        /// Replay recorded die faces instead of rolling (comma-separated)
        #[arg(long, value_delimiter = ',', conflicts_with = "seed")]
        faces: Vec<u32>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Recompute and refill a character's heroism
    Heroism {
        /// Character sheet (JSON)
        sheet: PathBuf,

        /// Write the updated heroism back to the sheet file
        #[arg(short, long)]
        write: bool,
    },

    /// Roll initiative for a round and show the turn order
    Initiative {
        /// Character sheets (JSON); each combatant's id is its file stem
        #[arg(required = true)]
        sheets: Vec<PathBuf>,

        /// Combatant ids that are defeated and roll no initiative
        #[arg(short, long)]
        defeated: Vec<String>,

        /// RNG seed for a reproducible round
        #[arg(long)]
        seed: Option<u64>,

        /// Replay recorded die faces instead of rolling (comma-separated)
        #[arg(long, value_delimiter = ',', conflicts_with = "seed")]
        faces: Vec<u32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate character sheets and the active ruleset
    Check {
        /// Character sheets (JSON)
        #[arg(required = true)]
        sheets: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = commands::load_ruleset(cli.rules.as_deref(), cli.preset.as_deref()).and_then(|ruleset| {
        match cli.command {
            Commands::Derive { sheet, json } => commands::derive::run(&sheet, &ruleset, json),
            Commands::Roll {
                sheet,
                attribute,
                skill,
                seed,
                faces,
                json,
            } => {
                let mut source = commands::make_source(seed, &faces);
                commands::roll::run(
                    &sheet,
                    &attribute,
                    skill.as_deref(),
                    source.as_mut(),
                    &ruleset,
                    json,
                )
            }
            Commands::Heroism { sheet, write } => commands::heroism::run(&sheet, write),
            Commands::Initiative {
                sheets,
                defeated,
                seed,
                faces,
                json,
            } => {
                let mut source = commands::make_source(seed, &faces);
                commands::initiative::run(&sheets, &defeated, source.as_mut(), &ruleset, json)
            }
            Commands::Check { sheets } => commands::check::run(&sheets, &ruleset),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `--json`. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
