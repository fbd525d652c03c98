//! Coursebook CLI - track courses, credits and grades

mod commands;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use coursebook::config::{self, CoursebookConfig};
use coursebook::storage::CourseStore;
use coursebook::CourseProvider;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "coursebook")]
#[command(version)]
#[command(about = "Track courses, credits and grades with a running average")]
#[command(long_about = r#"
Coursebook keeps your courses in a local SQLite database and shows
the average grade and total credits across all of them.

Example usage:
  coursebook add --name "Algorithms" --credits 4 --grade 95
  coursebook list
  coursebook edit 1 --grade 97
  coursebook show content://coursebook.courses/courses/1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// List every course with the grade/credit summary
    List,

    /// Show one course (by id or URI) or the whole collection (by URI)
    Show {
        /// Course id or content URI
        target: String,
    },

    /// Add a new course
    Add {
        #[arg(short, long, default_value = "")]
        name: String,

        #[arg(short, long, default_value = "")]
        credits: String,

        #[arg(short, long, default_value = "")]
        grade: String,
    },

    /// Edit an existing course
    Edit {
        /// Course id
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        credits: Option<String>,

        #[arg(short, long)]
        grade: Option<String>,
    },

    /// Delete one course
    Delete {
        /// Course id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every course
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the average grade and total credits
    Summary,

    /// Show where to contact the developer
    Contact,

    /// Serve the courses over a JSON HTTP API
    Serve {
        #[arg(short, long, default_value = "7878")]
        port: u16,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print a JSON envelope for a finished command
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Everything a command needs: the opened provider plus config-derived settings
pub struct AppContext {
    pub provider: CourseProvider,
    pub contact_url: String,
    pub database: PathBuf,
}

fn open_context(database: Option<&Path>, config_path: Option<&Path>) -> anyhow::Result<AppContext> {
    let config: CoursebookConfig = config::load_config(config_path)?.unwrap_or_default();
    let database = match (database, &config.database) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(path)) => PathBuf::from(path),
        (None, None) => config::default_database_path_in(&std::env::current_dir()?),
    };
    config::ensure_db_dir(&database)?;

    let store = CourseStore::open(&database)?;
    tracing::debug!("Using database {}", database.display());
    let provider = CourseProvider::with_settings(store, config.authority(), config.validation_rules()?);

    Ok(AppContext {
        provider,
        contact_url: config.contact_url().to_string(),
        database,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    let open = || open_context(cli.database.as_deref(), cli.config.as_deref());

    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.clone().unwrap_or_else(config::default_config_path);
            commands::run_init(output_mode, &path, cli.database.as_deref(), force)
        }
        Commands::List => commands::run_list(output_mode, &open()?),
        Commands::Show { target } => commands::run_show(output_mode, &open()?, &target),
        Commands::Add { name, credits, grade } => {
            commands::run_add(output_mode, &open()?, &name, &credits, &grade)
        }
        Commands::Edit { id, name, credits, grade } => {
            commands::run_edit(output_mode, &open()?, id, name, credits, grade)
        }
        Commands::Delete { id, yes } => commands::run_delete(output_mode, &open()?, id, yes),
        Commands::Clear { yes } => commands::run_clear(output_mode, &open()?, yes),
        Commands::Summary => commands::run_summary(output_mode, &open()?),
        Commands::Contact => commands::run_contact(output_mode, &open()?),
        Commands::Serve { port } => {
            let ctx = open()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(coursebook::server::start_server(port, ctx.provider))
        }
    }
}
