use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use carbon_tally::config::Config;
use carbon_tally::credentials::{AdminGate, CredentialError, EnvSecrets};
use carbon_tally::factors::EmissionFactorTable;
use carbon_tally::input::{CoercionNote, QuantitySheet};
use carbon_tally::output;
use carbon_tally::records::{HistorySummary, RecordStore, SubmitGuard};
use carbon_tally::submit::{submit, SaveOutcome};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_STORE: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_REJECTED: i32 = 5;

const ANONYMOUS_USER: &str = "anonymous";

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate one day's footprint and save it
    Calc {
        /// YAML quantity sheet
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Set a quantity, e.g. --set food.牛肉=0.3 (repeatable, applied after --input)
        #[arg(long = "set", value_name = "CATEGORY.ITEM=QTY")]
        assignments: Vec<String>,

        /// Ask for every quantity on the terminal
        #[arg(long, conflicts_with = "input")]
        interactive: bool,

        /// Day the record is for (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// User the record belongs to
        #[arg(short, long)]
        user: Option<String>,

        /// Print the result without saving it
        #[arg(long)]
        no_save: bool,

        /// Also show the collective-impact projection
        #[arg(long)]
        impact: bool,

        /// Show per-item contributions
        #[arg(long)]
        detail: bool,
    },
    /// Show a user's saved days
    History {
        /// User to show (defaults to the configured user)
        #[arg(short, long)]
        user: Option<String>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show every user's records (requires the admin secret)
    Admin {
        /// Also write all records to this CSV file
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
    /// Print the emission factor table in effect
    Factors,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "carbon-tally")]
#[command(about = "Daily carbon footprint calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/carbon-tally/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    carbon_tally::install_crypto_provider();

    let cli = Cli::parse();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = cli.command {
        if let Err(e) = carbon_tally::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match carbon_tally::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config.validate() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let table = match carbon_tally::factors::build_table(config.factors.as_ref()) {
        Ok(t) => t,
        Err(errors) => {
            eprintln!("Factor config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose && config.factors.is_some() {
        eprintln!("Using factor overrides from config");
    }

    let verbose = cli.verbose;
    let code = match cli.command {
        Commands::Calc {
            input,
            assignments,
            interactive,
            date,
            user,
            no_save,
            impact,
            detail,
        } => {
            let request = CalcRequest {
                input,
                assignments,
                interactive,
                date,
                user,
                no_save,
                impact,
                detail,
            };
            run_calc(&config, &table, request, verbose).await
        }
        Commands::History { user, tsv } => run_history(&config, user, tsv, verbose).await,
        Commands::Admin { export } => run_admin(&config, export, verbose).await,
        Commands::Factors => {
            println!(
                "{}",
                output::format_factor_table(&table, output::should_use_colors())
            );
            EXIT_SUCCESS
        }
        Commands::Init => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

struct CalcRequest {
    input: Option<PathBuf>,
    assignments: Vec<String>,
    interactive: bool,
    date: Option<NaiveDate>,
    user: Option<String>,
    no_save: bool,
    impact: bool,
    detail: bool,
}

fn open_store_or_exit(config: &Config, verbose: bool) -> RecordStore {
    match carbon_tally::records::open_store(&config.store, || {
        carbon_tally::credentials::supabase_key(verbose)
    }) {
        Ok(store) => {
            if verbose {
                eprintln!("Record store: {}", store.describe());
            }
            store
        }
        Err(e) => {
            eprintln!("Failed to open record store: {:#}", e);
            std::process::exit(EXIT_STORE);
        }
    }
}

fn report_notes(notes: &[CoercionNote], verbose: bool) {
    if !verbose {
        return;
    }
    for note in notes {
        eprintln!(
            "  {}.{} counted as 0 ({})",
            note.category, note.item, note.reason
        );
    }
}

async fn run_calc(
    config: &Config,
    table: &EmissionFactorTable,
    request: CalcRequest,
    verbose: bool,
) -> i32 {
    let mut sheet = QuantitySheet::new();
    let mut sheet_date = None;
    let mut sheet_user = None;

    if let Some(path) = &request.input {
        match carbon_tally::input::load_sheet(path) {
            Ok((raw, loaded, notes)) => {
                if verbose {
                    eprintln!("Loaded quantity sheet {}", path.display());
                }
                report_notes(&notes, verbose);
                sheet = loaded;
                sheet_user = raw.user;
                if let Some(text) = raw.date {
                    match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
                        Ok(d) => sheet_date = Some(d),
                        Err(e) => {
                            eprintln!("Invalid date '{}' in {}: {}", text, path.display(), e);
                            return EXIT_CONFIG;
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("Input error: {:#}", e);
                return EXIT_CONFIG;
            }
        }
    } else if request.interactive {
        match carbon_tally::input::prompt_sheet(table) {
            Ok((prompted, notes)) => {
                report_notes(&notes, verbose);
                sheet = prompted;
            }
            Err(e) => {
                eprintln!("Input error: {:#}", e);
                return EXIT_CONFIG;
            }
        }
    }

    for assignment in &request.assignments {
        match carbon_tally::input::parse_assignment(assignment) {
            Ok((category, item, raw)) => {
                if let Some(note) = sheet.set_raw(category, &item, Some(&raw)) {
                    report_notes(&[note], verbose);
                }
            }
            Err(e) => {
                eprintln!("Input error: {:#}", e);
                return EXIT_CONFIG;
            }
        }
    }

    if verbose {
        for (category, item) in sheet.unknown_items(table) {
            eprintln!("  {}.{} has no emission factor and is ignored", category, item);
        }
    }

    let date = request
        .date
        .or(sheet_date)
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let user_id = request
        .user
        .or(sheet_user)
        .or_else(|| config.user.clone())
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());

    let store = if request.no_save {
        None
    } else {
        Some(open_store_or_exit(config, verbose))
    };

    let guard = SubmitGuard::new();
    let submission = match submit(store.as_ref(), &guard, table, &sheet, date, &user_id, verbose).await
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_REJECTED;
        }
    };

    let use_colors = output::should_use_colors();
    println!("{} for {}", date.format("%Y-%m-%d"), user_id);
    println!(
        "{}",
        output::format_footprint(&submission.footprint, use_colors)
    );

    if request.detail || verbose {
        println!();
        println!(
            "{}",
            output::format_contributions(&submission.footprint, table, use_colors)
        );
    }

    if request.impact {
        let constants = config.impact_constants();
        let projection = carbon_tally::engine::project(submission.footprint.total, &constants);
        println!();
        println!(
            "{}",
            output::format_impact(&projection, constants.population_scale, use_colors)
        );
    }

    match submission.outcome {
        SaveOutcome::Saved(_) | SaveOutcome::Skipped => EXIT_SUCCESS,
        SaveOutcome::Failed(e) => {
            eprintln!("Failed to save record: {}", e);
            if e.is_auth() {
                EXIT_AUTH
            } else {
                EXIT_STORE
            }
        }
    }
}

async fn run_history(config: &Config, user: Option<String>, tsv: bool, verbose: bool) -> i32 {
    let user_id = user
        .or_else(|| config.user.clone())
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());
    let store = open_store_or_exit(config, verbose);

    let start = Instant::now();
    let records = match store.fetch_for_user(&user_id).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Could not read history for {}: {}", user_id, e);
            return if e.is_auth() { EXIT_AUTH } else { EXIT_STORE };
        }
    };
    if verbose {
        eprintln!("Fetched {} records in {:?}", records.len(), start.elapsed());
    }

    if tsv {
        if !records.is_empty() {
            println!("{}", output::format_tsv(&records));
        }
        return EXIT_SUCCESS;
    }

    let use_colors = output::should_use_colors();
    println!("{}", output::format_records_table(&records, false, use_colors));
    if let Some(summary) = HistorySummary::from_records(&records) {
        println!();
        println!("{}", output::format_summary(&summary, use_colors));
    }

    EXIT_SUCCESS
}

async fn run_admin(config: &Config, export: Option<PathBuf>, verbose: bool) -> i32 {
    let gate = AdminGate::from_source(&EnvSecrets);
    if !gate.is_enabled() {
        eprintln!("{}", CredentialError::AdminDisabled);
        return EXIT_AUTH;
    }

    let attempt = match carbon_tally::credentials::prompt_for_admin_secret() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_AUTH;
        }
    };
    if let Err(e) = gate.verify(&attempt) {
        eprintln!("{}", e);
        return EXIT_AUTH;
    }

    let store = open_store_or_exit(config, verbose);
    let start = Instant::now();
    let records = match store.fetch_all().await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Could not read records: {}", e);
            return if e.is_auth() { EXIT_AUTH } else { EXIT_STORE };
        }
    };
    if verbose {
        eprintln!("Fetched {} records in {:?}", records.len(), start.elapsed());
    }

    println!(
        "{}",
        output::format_records_table(&records, true, output::should_use_colors())
    );

    if let Some(path) = export {
        if let Err(e) = carbon_tally::records::export_csv(&path, &records) {
            eprintln!("Export failed: {:#}", e);
            return EXIT_STORE;
        }
        eprintln!("Exported {} records to {}", records.len(), path.display());
    }

    EXIT_SUCCESS
}
