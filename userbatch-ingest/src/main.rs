//! userbatch - command-line client for bulk user management
//!
//! Talks to a userbatch server over HTTP, or directly to a SQLite database
//! file with `--database`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use userbatch_common::config::TomlConfig;
use userbatch_common::db::{init_database, SqliteUserStore};
use userbatch_common::UserStore;
use userbatch_ingest::{
    FormInput, HttpUserStore, IngestError, IngestOrchestrator, IngestResult,
};

#[derive(Debug, Parser)]
#[command(name = "userbatch", version, about = "Bulk user management client")]
struct Cli {
    /// Server base URL (defaults to the config file's [client] base_url)
    #[arg(long, env = "USERBATCH_SERVER", conflicts_with = "database")]
    server: Option<String>,

    /// Operate directly on a SQLite database file instead of a server
    #[arg(long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all users
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a single user
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        /// Birth date, YYYY-MM-DD
        #[arg(long)]
        birth: Option<String>,
    },
    /// Import users from the first sheet of a spreadsheet
    Import {
        /// .xlsx, .xls, .xlsb or .ods file with name, age and birth columns
        file: PathBuf,
    },
    /// Delete users by row number (as shown by `list`) or by id
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct DeleteArgs {
    /// 1-based row numbers, comma separated
    #[arg(long, value_delimiter = ',', required_unless_present = "ids")]
    rows: Vec<usize>,

    /// Record ids, comma separated
    #[arg(long = "id", value_delimiter = ',', conflicts_with = "rows")]
    ids: Vec<i64>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = TomlConfig::load_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let store: Arc<dyn UserStore> = match &cli.database {
        Some(path) => {
            let pool = init_database(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Arc::new(SqliteUserStore::new(pool))
        }
        None => {
            let base_url = cli.server.clone().unwrap_or(config.client.base_url);
            debug!("Using server {}", base_url);
            Arc::new(HttpUserStore::new(base_url)?)
        }
    };

    let mut panel = IngestOrchestrator::new(store);
    let outcome = run(&mut panel, cli.command).await;

    print_notices(&panel);
    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            if !notice_covers(&panel, &e) {
                eprintln!("Error: {}", e);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(panel: &mut IngestOrchestrator, command: Command) -> IngestResult<()> {
    match command {
        Command::List { json } => {
            panel.refresh().await?;
            if json {
                let text = serde_json::to_string_pretty(panel.users())
                    .unwrap_or_else(|_| "[]".to_string());
                println!("{}", text);
            } else {
                print_table(panel);
            }
        }
        Command::Add { name, age, birth } => {
            panel.submit_form(&FormInput { name, age, birth }).await?;
        }
        Command::Import { file } => {
            let report = panel.import_file(&file).await?;
            println!(
                "{} rows read, {} skipped (missing fields), {} rejected (invalid values), {} imported",
                report.rows_read, report.unmappable, report.rejected, report.inserted
            );
        }
        Command::Delete(args) => {
            panel.refresh().await?;
            if args.ids.is_empty() {
                for row in &args.rows {
                    if *row >= 1 {
                        panel.select_row(row - 1, true);
                    }
                }
                panel.request_delete_selected()?;
            } else {
                panel.request_delete_ids(args.ids)?;
            }

            if args.yes || confirm(panel.confirmation_prompt().unwrap_or_default()) {
                panel.confirm_delete().await?;
            } else {
                panel.cancel_delete();
                println!("Cancelled");
            }
        }
    }
    Ok(())
}

fn print_table(panel: &IngestOrchestrator) {
    println!("{:>4}  {:>6}  {:<24}  {:>4}  {:<10}", "#", "ID", "Name", "Age", "Birth Date");
    for (index, user) in panel.users().iter().enumerate() {
        println!(
            "{:>4}  {:>6}  {:<24}  {:>4}  {:<10}",
            index + 1,
            user.id,
            user.name,
            user.age,
            user.birth
        );
    }
    println!("Total: {} users", panel.users().len());
}

fn print_notices(panel: &IngestOrchestrator) {
    for notice in panel.notices().active(Instant::now()) {
        eprintln!("{}", notice.message);
    }
}

/// Whether an active notice already shows the error text
fn notice_covers(panel: &IngestOrchestrator, err: &IngestError) -> bool {
    let text = err.to_string();
    panel
        .notices()
        .active(Instant::now())
        .iter()
        .any(|notice| notice.message == text)
}

fn confirm(prompt: String) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
