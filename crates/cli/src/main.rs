mod commands;
mod tui;

use anyhow::Result;
use billed_core::BilledError;
use billed_utils::output::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "billed",
    about = "Billed: employee expense bills.\nList your bills, open the new-bill form, preview receipts.",
    version,
    propagate_version = true
)]
struct Cli {
    #[arg(long, short = 'o', global = true, default_value = "table")]
    output: CliOutputFormat,

    /// Debug logging (overrides the config; RUST_LOG wins over both).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat { Table, Json, JsonPretty, Html }

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> OutputFormat {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::JsonPretty => OutputFormat::JsonPretty,
            CliOutputFormat::Html => OutputFormat::Html,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  TOP-LEVEL
// ═══════════════════════════════════════════════════════════════════════

#[derive(Subcommand)]
enum Commands {
    /// List your bills, most recent first.
    Bills {
        /// Serve the built-in demo bills instead of calling the store.
        #[arg(long)]
        offline: bool,
    },

    /// Open the new-bill form.
    NewBill,

    /// Preview the receipt attached to a bill.
    Preview {
        /// Bill id, as listed by `billed bills`.
        id: String,
        #[arg(long)]
        offline: bool,
    },

    /// Manage the stored user record.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show or change configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Launch the interactive bills screen.
    Tui {
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store who is connected.
    Set {
        #[arg(long)]
        email: String,
        /// employee or admin.
        #[arg(long = "type", default_value = "employee")]
        user_type: String,
        /// API token forwarded to the store.
        #[arg(long)]
        jwt: Option<String>,
    },
    /// Print the stored user record.
    Show,
    /// Forget the stored user record.
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration.
    Show,
    /// Set the store API base URL.
    Url { url: String },
    /// Set the date locale (fr or en).
    Locale { locale: String },
    /// Toggle verbose logging.
    Verbose {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

// ═══════════════════════════════════════════════════════════════════════
//  MAIN
// ═══════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let fmt: OutputFormat = cli.output.into();

    if let Err(e) = run(cli, fmt).await {
        let code = report(&e, fmt);
        std::process::exit(code);
    }
}

async fn run(cli: Cli, fmt: OutputFormat) -> Result<()> {
    billed_core::init_workspace()?;
    let config = billed_core::workspace::load_config()?;

    let default_level = if cli.verbose || config.system.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Bills { offline } => commands::bills::list(offline, fmt).await,
        Commands::NewBill => commands::bills::new_bill(fmt).await,
        Commands::Preview { id, offline } => commands::bills::preview(&id, offline, fmt).await,

        Commands::Session { action } => match action {
            SessionAction::Set { email, user_type, jwt } => {
                commands::session::set(&email, &user_type, jwt, fmt)
            }
            SessionAction::Show => commands::session::show(fmt),
            SessionAction::Clear => commands::session::clear(),
        },

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(fmt),
            ConfigAction::Url { url } => commands::config::set_url(&url),
            ConfigAction::Locale { locale } => commands::config::set_locale(&locale),
            ConfigAction::Verbose { enabled } => commands::config::set_verbose(enabled),
        },

        Commands::Tui { offline } => tui::run(offline).await,
    }
}

/// Print an error the way the output format expects; returns the exit code.
fn report(e: &anyhow::Error, fmt: OutputFormat) -> i32 {
    let internal;
    let err = match e.downcast_ref::<BilledError>() {
        Some(err) => err,
        None => {
            internal = BilledError::Internal(format!("{e:#}"));
            &internal
        }
    };

    match fmt {
        OutputFormat::Json | OutputFormat::JsonPretty => println!("{}", err.to_json()),
        OutputFormat::Table | OutputFormat::Html => {
            let detail = err.detail();
            eprintln!("Error: {}", detail.message);
            for hint in &detail.hints {
                eprintln!("  hint: {hint}");
            }
        }
    }
    err.exit_code()
}
