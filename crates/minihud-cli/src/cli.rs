use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "minihud",
    about = "MiniHUD: inspect and drive per-object HUD saved data",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Saved-data document holding every object's entries
    #[arg(long, global = true, default_value = "minihud.json")]
    pub file: PathBuf,

    /// TOML file with key prefix and chunk limits
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Side {
    Left,
    Right,
}

#[derive(Subcommand)]
pub enum Command {
    /// Attach a HUD to an object and persist its config
    Register(RegisterArgs),
    /// Show bar values, badges and pointer
    Show(ObjectArgs),
    /// Show the chunk layout of both records
    Inspect(ObjectArgs),
    /// Set a bar to a value (clamped to its max)
    Set(SetArgs),
    /// Raise a bar by one
    Inc(BarArgs),
    /// Lower a bar by one
    Dec(BarArgs),
    /// Change a bar's max
    SetMax(SetMaxArgs),
    /// Recolor a bar
    Color(ColorArgs),
    /// Show, hide or tint a badge
    Badge(BadgeArgs),
    /// Apply raw JSON commands in order, e.g. '{"op":"add_bar","name":"Mana"}' '{"op":"commit"}'
    Apply(ApplyArgs),
    /// Delete an object's HUD records
    Purge(ObjectArgs),
    /// List objects with saved data
    List,
}

#[derive(Args)]
pub struct ObjectArgs {
    pub object: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    pub object: String,
    /// Registration options as JSON
    #[arg(long, conflicts_with = "options_file")]
    pub options: Option<String>,
    /// Registration options from a JSON file
    #[arg(long)]
    pub options_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct BarArgs {
    pub object: String,
    pub bar: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub object: String,
    pub bar: String,
    #[arg(allow_negative_numbers = true)]
    pub value: i64,
}

#[derive(Args)]
pub struct SetMaxArgs {
    pub object: String,
    pub bar: String,
    #[arg(allow_negative_numbers = true)]
    pub max: i64,
}

#[derive(Args)]
pub struct ColorArgs {
    pub object: String,
    pub bar: String,
    pub color: String,
    /// Color for the unfilled part
    #[arg(long)]
    pub empty: Option<String>,
}

#[derive(Args)]
pub struct BadgeArgs {
    pub object: String,
    pub side: Side,
    /// Image to show; omit to keep the current one
    pub url: Option<String>,
    /// Hide the badge
    #[arg(long, conflicts_with = "url")]
    pub off: bool,
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub object: String,
    /// One JSON command per argument; editor edits must be followed by a commit
    #[arg(required = true)]
    pub commands: Vec<String>,
}
