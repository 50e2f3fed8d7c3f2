//! CliniPick CLI
//!
//! Command-line interface for the clinic record pickers.
//! Provides one-shot search and list commands plus the interactive TUI.

use clap::{Parser, Subcommand, ValueEnum};
use clinipick::{
    AppConfig, ClinicData, CliniPickError, Client, Collaborator, Directory, ListView, Order,
    PickRecord, PickerStatus, Resource, SearchSelect, Session,
};
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long one-shot commands wait for the collaborator
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// CliniPick - searchable record pickers for clinic front desks
#[derive(Parser)]
#[command(name = "clinipick")]
#[command(version)]
#[command(about = "Debounced record pickers and paged lists", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON clinic data file (built-in sample data when omitted)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Clinic to work in; overrides the configuration
    #[arg(long, global = true)]
    clinic: Option<String>,

    /// Front-desk user shown in the title bar
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Client,
    Order,
    Resource,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive appointment form
    Tui {
        /// Page the client list through the collaborator
        #[arg(long)]
        server: bool,
    },

    /// Run one picker search and print the options
    Search {
        /// Record kind to search
        #[arg(value_enum)]
        kind: Kind,

        /// Search text (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Maximum records requested
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one page of the client list
    List {
        /// Case-insensitive filter text
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Page to show, clamped to the available range
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page (configuration value when omitted)
        #[arg(long)]
        page_size: Option<usize>,

        /// Page through the collaborator instead of in memory
        #[arg(long)]
        server: bool,
    },

    /// Write the built-in sample data as JSON
    SampleData {
        /// Output file path
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    clinipick::logging::init(cli.verbose);
    clinipick::logging::separator("startup");
    tracing::info!(version = clinipick::VERSION, "CliniPick starting up");

    if let Err(e) = dispatch(cli) {
        tracing::error!(error = %e, "command failed");
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> clinipick::Result<()> {
    if let Commands::SampleData { path } = &cli.command {
        return cmd_sample_data(path);
    }

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(clinic) = cli.clinic {
        config.clinic = clinic;
    }
    config.validate()?;

    let data = match &cli.data {
        Some(path) => ClinicData::load(path)?,
        None => ClinicData::sample(),
    };
    if data.clinic(&config.clinic).is_none() {
        let known: Vec<&str> = data.clinic_names().collect();
        eprintln!(
            "{} known clinics: {}",
            style("hint:").cyan(),
            known.join(", ")
        );
        return Err(CliniPickError::UnknownScope(config.clinic.clone()));
    }

    let mut session = Session::new(config.clinic.clone());
    if let Some(user) = cli.user {
        session = session.with_user(user);
    }

    match cli.command {
        Commands::Tui { server } => clinipick::tui::run(session, &config, &data, server),
        Commands::Search {
            kind,
            query,
            limit,
            json,
        } => {
            if let Some(limit) = limit {
                config.picker.fetch_limit = limit;
            }
            config.validate()?;
            cmd_search(kind, &query, json, &session, &config, &data)
        }
        Commands::List {
            filter,
            page,
            page_size,
            server,
        } => {
            let page_size = page_size.unwrap_or(config.page_size);
            cmd_list(&filter, page, page_size, server, &session, &config, &data)
        }
        Commands::SampleData { .. } => Ok(()),
    }
}

fn cmd_search(
    kind: Kind,
    query: &str,
    json: bool,
    session: &Session,
    config: &AppConfig,
    data: &ClinicData,
) -> clinipick::Result<()> {
    let dirs = data.directories(config.simulated_latency());
    match kind {
        Kind::Client => run_search::<Client>(dirs.clients, query, json, session, config),
        Kind::Order => run_search::<Order>(dirs.orders, query, json, session, config),
        Kind::Resource => run_search::<Resource>(dirs.resources, query, json, session, config),
    }
}

fn run_search<R: PickRecord + Serialize>(
    directory: Arc<Directory<R>>,
    query: &str,
    json: bool,
    session: &Session,
    config: &AppConfig,
) -> clinipick::Result<()> {
    let collaborator: Arc<dyn Collaborator<R>> = directory;
    let mut picker: SearchSelect<R> = SearchSelect::new(session, collaborator, &config.picker);

    // Type the whole query at once, then let the quiet period run out
    let typed_at = Instant::now();
    picker.open();
    picker.input(query, typed_at);
    picker.tick(typed_at + config.picker.quiet_period());
    if picker.status() == PickerStatus::Loading && !picker.wait_for_results(FETCH_TIMEOUT) {
        return Err(CliniPickError::fetch("timed out waiting for results"));
    }

    match picker.status() {
        PickerStatus::TypeMore { min_len } => {
            println!(
                "{} Type at least {} characters to search",
                style("!").yellow().bold(),
                min_len
            );
            return Ok(());
        }
        PickerStatus::Error(msg) => return Err(CliniPickError::FetchFailed(msg)),
        _ => {}
    }

    if json {
        let records: Vec<&R> = picker.options().iter().map(|o| &o.source).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{} {} search for '{}' in {}:",
        style("→").cyan().bold(),
        R::KIND,
        style(query.trim()).yellow(),
        session.clinic()
    );
    println!();

    if picker.options().is_empty() {
        println!("  {}", style("No matches").dim());
        return Ok(());
    }

    for (i, option) in picker.options().iter().enumerate() {
        println!(
            "  {} {}",
            style(format!("{:3}.", i + 1)).dim(),
            style(&option.label).cyan()
        );
        if !option.subtitle.is_empty() {
            println!("       {}", style(&option.subtitle).dim());
        }
    }

    println!();
    println!("Found {} results", style(picker.options().len()).green());
    Ok(())
}

fn cmd_list(
    filter: &str,
    page: usize,
    page_size: usize,
    server: bool,
    session: &Session,
    config: &AppConfig,
    data: &ClinicData,
) -> clinipick::Result<()> {
    let dirs = data.directories(config.simulated_latency());

    let mut view: ListView<Client> = if server {
        ListView::remote(session, dirs.clients.clone(), page_size)?
    } else {
        let records = dirs
            .clients
            .snapshot(session.scope_key())
            .ok_or_else(|| CliniPickError::UnknownScope(session.scope_key().to_string()))?;
        ListView::local(records, page_size)?
    };

    view.set_filter(filter);
    view.wait(FETCH_TIMEOUT);
    if page != 1 {
        view.go_to(page);
        view.wait(FETCH_TIMEOUT);
    }

    if let Some(err) = view.error() {
        return Err(CliniPickError::FetchFailed(err.to_string()));
    }

    let state = view.page();
    println!(
        "{} Clients in {} (page {} of {}, {} total)",
        style("→").cyan().bold(),
        session.clinic(),
        style(state.current_page).yellow(),
        state.total_pages.max(1),
        state.total_items
    );
    println!();

    let rows = view.visible();
    if rows.is_empty() {
        println!("  {}", style("No clients match this filter").dim());
        return Ok(());
    }

    let first = state.first_index();
    for (i, client) in rows.iter().enumerate() {
        println!(
            "  {} {:<28} {}",
            style(format!("{:3}.", first + i + 1)).dim(),
            style(client.label()).cyan(),
            style(client.subtitle()).dim()
        );
    }
    Ok(())
}

fn cmd_sample_data(path: &Path) -> clinipick::Result<()> {
    ClinicData::sample().save(path)?;
    println!(
        "{} Sample data written to {}",
        style("✓").green().bold(),
        style(path.display()).cyan()
    );
    Ok(())
}
