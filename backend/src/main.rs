//! Candidates ETL CLI - load recruitment CSV exports into a database
//!
//! # Commands
//!
//! ```bash
//! candidates-etl run candidates.csv -o transformed.csv   # Full batch: raw + transformed tables
//! candidates-etl transform candidates.csv -o out.csv     # CSV to CSV, no database
//! candidates-etl init-db                                 # Create both tables
//! candidates-etl categories                              # Show the technology mapping
//! ```
//!
//! Connection settings come from `PGDIALECT`, `PGUSER`, `PGPASSWD`, `PGHOST`,
//! `PGPORT` and `PGDB` (a `.env` file is honored), or from `--database-url`.

use candidates_etl::logs::route_status_to_stderr;
use candidates_etl::{
    mapping_description, run_pipeline, transform_file, Database, DatabaseConfig, LoadMode,
    PipelineOptions, PipelineSummary,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "candidates-etl")]
#[command(about = "Normalize candidate CSV exports and load them into a database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full batch: create tables, load raw rows, transform, load transformed rows
    Run {
        /// Input CSV file (`;`-delimited, UTF-8)
        input: PathBuf,

        /// Also write the transformed CSV here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delete existing rows before loading
        #[arg(long)]
        replace: bool,

        /// Do not load the raw table
        #[arg(long)]
        skip_raw: bool,

        /// Connect to this URL instead of the PG* environment variables
        #[arg(long)]
        database_url: Option<String>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transform a CSV file without touching the database
    Transform {
        /// Input CSV file
        input: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the CandidatesRaw and CandidatesTransformed tables
    InitDb {
        /// Connect to this URL instead of the PG* environment variables
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Show the technology → category mapping
    Categories,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // stdout carries only the JSON summary
    if let Commands::Run { json: true, .. } | Commands::Transform { json: true, .. } = cli.command {
        route_status_to_stderr(true);
    }

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            replace,
            skip_raw,
            database_url,
            json,
        } => cmd_run(input, output, replace, skip_raw, database_url, json).await,

        Commands::Transform { input, output, json } => cmd_transform(input, output, json),

        Commands::InitDb { database_url } => cmd_init_db(database_url).await,

        Commands::Categories => cmd_categories(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn connect(database_url: Option<String>) -> Result<Database, Box<dyn std::error::Error>> {
    let db = match database_url {
        Some(url) => Database::connect_url(&url).await?,
        None => Database::connect(&DatabaseConfig::from_env()?).await?,
    };
    Ok(db)
}

async fn cmd_run(
    input: PathBuf,
    output: Option<PathBuf>,
    replace: bool,
    skip_raw: bool,
    database_url: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect(database_url).await?;

    let options = PipelineOptions {
        output,
        load_raw: !skip_raw,
        load_transformed: true,
        mode: if replace { LoadMode::Replace } else { LoadMode::Append },
        ..Default::default()
    };

    let summary = run_pipeline(&input, &options, Some(&db)).await;
    db.close().await;

    print_summary(&summary?, json)
}

fn cmd_transform(input: PathBuf, output: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let summary = transform_file(&input, &output)?;
    print_summary(&summary, json)
}

async fn cmd_init_db(database_url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect(database_url).await?;
    db.create_tables().await?;
    eprintln!("✅ Tables CandidatesRaw and CandidatesTransformed are ready");
    db.close().await;
    Ok(())
}

fn cmd_categories() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", mapping_description());
    Ok(())
}

fn print_summary(summary: &PipelineSummary, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    eprintln!("\n📊 Results:");
    eprintln!("   Rows: {}", summary.rows);
    eprintln!("   Hired: {}", summary.hired);
    if let Some(n) = summary.raw_loaded {
        eprintln!("   CandidatesRaw: {} rows", n);
    }
    if let Some(n) = summary.transformed_loaded {
        eprintln!("   CandidatesTransformed: {} rows", n);
    }
    if let Some(ref path) = summary.output {
        eprintln!("   Output: {}", path.display());
    }
    eprintln!("\n✨ Done!");
    Ok(())
}
