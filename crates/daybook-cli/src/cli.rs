use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Keep a mood journal from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CLI profile name holding the backend configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the journal timeline, newest day first
    #[command(alias = "timeline")]
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a month with the days that have entries marked
    Calendar {
        /// Month to show (yyyy-MM), defaults to the current month
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<String>,
    },
    /// Open a day: edit its entry, or write a new one when it has none
    Open {
        /// Day to open (yyyy-MM-dd)
        date: String,
    },
    /// Create an entry through the entry form
    #[command(alias = "add")]
    New {
        /// Day of the entry (yyyy-MM-dd), defaults to today
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
        /// Optional title
        #[arg(long)]
        title: Option<String>,
        /// Optional mood tag
        #[arg(long)]
        mood: Option<String>,
        /// Photo to attach
        #[arg(long, value_name = "PATH")]
        photo: Option<PathBuf>,
        /// Entry content (stdin or $EDITOR when omitted)
        content: Vec<String>,
    },
    /// Pick a mood, then write today's entry on a mood-themed screen
    Write {
        /// Mood for the entry (required for new entries)
        #[arg(long)]
        mood: Option<String>,
        /// Optional title
        #[arg(long)]
        title: Option<String>,
        /// Photo to attach
        #[arg(long, value_name = "PATH")]
        photo: Option<PathBuf>,
        /// Rewrite an existing entry instead of creating one
        #[arg(long, value_name = "ID", conflicts_with_all = ["title", "photo"])]
        entry_id: Option<String>,
    },
    /// Export all entries
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign up, sign in and out of the journal backend
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Supabase project URL
        #[arg(long, value_name = "URL")]
        supabase_url: Option<String>,
        /// Supabase anon/public key
        #[arg(long, value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Storage bucket for entry photos
        #[arg(long, value_name = "NAME")]
        photo_bucket: Option<String>,
        /// Optional bootstrap manifest URL (e.g. <https://api.example.com/v1/bootstrap>)
        #[arg(long, value_name = "URL")]
        bootstrap_url: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account and store the session in the keychain
    Signup {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Display name
        #[arg(long, value_name = "NAME")]
        name: String,
    },
    /// Sign in with email/password and store the session in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show auth status for profile
    Status,
    /// Sign out and clear the stored session
    Logout,
}
