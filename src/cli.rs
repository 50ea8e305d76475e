use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::planner::ServiceType;

/// partyplan: birthday party planning assistant.
///
/// Keeps one plan per user (budget, guests, timeline, checklist, photos,
/// preferences) in a JSON file and asks a text-generation CLI for
/// themed party plans.
#[derive(Debug, Parser)]
#[command(name = "partyplan", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every subcommand. Each can also come from
/// `PARTYPLAN_*` env vars or the config file. Precedence: CLI > env > file.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User whose plan to open.
    #[arg(long, short = 'u', global = true)]
    pub user: Option<String>,

    /// Directory holding party_plan_<user>.json (default: ".").
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Text-generation command; the prompt is passed as its last argument (default: "llm").
    #[arg(long, global = true)]
    pub generator_cmd: Option<String>,

    /// Extra arguments for the generator, space-separated, placed before the prompt.
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub generator_args: Option<String>,

    /// Model passed to the generator as `--model <MODEL>`.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Seconds to wait for the generator (default: 120).
    #[arg(long, global = true)]
    pub generate_timeout_sec: Option<u64>,

    /// File with a custom plan prompt; `{{DETAILS}}` is replaced by the request.
    #[arg(long, global = true)]
    pub prompt_template: Option<PathBuf>,

    /// Log level filter (default: "info"). Overridden by PARTYPLAN_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append structured JSON logs to this file as well as stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Set or show the party budget.
    #[command(subcommand)]
    Budget(BudgetCommand),

    /// Recommend venues, caterers and entertainment within budget.
    Recommend(RecommendArgs),

    /// Book a service (records the request; no booking system is contacted).
    Book(BookArgs),

    /// Manage the guest list.
    #[command(subcommand)]
    Guest(GuestCommand),

    /// Update or view preferences.
    #[command(subcommand)]
    Pref(PrefCommand),

    /// Export the party plan as JSON.
    Export(ExportArgs),

    /// Manage the event timeline.
    #[command(subcommand)]
    Timeline(TimelineCommand),

    /// Manage the photo gallery.
    #[command(subcommand)]
    Photo(PhotoCommand),

    /// Manage the checklist.
    #[command(subcommand)]
    Checklist(ChecklistCommand),

    /// Generate a party plan from a free-text description.
    Plan(DetailsArgs),

    /// Generate an adjusted plan from new details and re-save the current plan.
    Adjust(DetailsArgs),

    /// Print the plan-generation prompt template.
    Prompt(PromptArgs),

    /// Interactive menu.
    Shell,
}

#[derive(Debug, Subcommand)]
pub enum BudgetCommand {
    /// Replace the budget.
    Set {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Print the current budget.
    Show,
}

#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    /// Budget to filter against instead of the stored one.
    #[arg(long)]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct BookArgs {
    #[arg(value_enum)]
    pub service: ServiceType,

    /// Service details, e.g. its name.
    pub details: String,
}

#[derive(Debug, Subcommand)]
pub enum GuestCommand {
    Add { name: String },
    Remove { name: String },
    List,
    /// Show every guest with their RSVP status.
    Rsvp,
}

#[derive(Debug, Subcommand)]
pub enum PrefCommand {
    /// Set a preference; the value is stored as a string unless --json is given.
    Set {
        key: String,
        value: String,
        /// Parse VALUE as JSON.
        #[arg(long)]
        json: bool,
    },
    Show,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Destination file (default: the user's plan file).
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum TimelineCommand {
    /// Add a task due DAYS days from today.
    Add {
        task: String,
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum PhotoCommand {
    Add { path: PathBuf },
    List,
}

#[derive(Debug, Subcommand)]
pub enum ChecklistCommand {
    Add { item: String },
    List,
}

#[derive(Debug, Clone, Args)]
pub struct DetailsArgs {
    /// Free-text description of the party.
    #[arg(required = true, num_args = 1..)]
    pub details: Vec<String>,
}

impl DetailsArgs {
    pub fn text(&self) -> String {
        self.details.join(" ")
    }
}

#[derive(Debug, Clone, Args)]
pub struct PromptArgs {
    /// Write the prompt to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
