use std::path::PathBuf;

use anyhow::Context;
use cgpa_dashboard::config::{DashboardConfig, DEFAULT_BRANCHES, DEFAULT_DATA_PATH};
use cgpa_dashboard::{
    compute_aggregates, dataset, derive_view, export, report, RankedRecord, Scope, SortKey,
    StudentRecord, ViewState,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cgpa-dashboard")]
#[command(about = "Student CGPA lookup, ranking and branch statistics", long_about = None)]
struct Cli {
    /// Raw student export (JSON array)
    #[arg(long, global = true, env = "CGPA_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    /// Known branch codes, comma separated
    #[arg(
        long,
        global = true,
        env = "CGPA_BRANCHES",
        value_delimiter = ',',
        default_value = DEFAULT_BRANCHES
    )]
    branches: Vec<String>,
    /// JSON file overriding where each field is read from
    #[arg(long, global = true)]
    layout: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample export to the data path
    Seed,
    /// Show overall and per-branch statistics
    Stats {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the ranked, filtered and sorted student table
    Table {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Look up one student by enrolment number
    Lookup {
        #[arg(long)]
        enrolment: String,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "overall")]
        scope: Scope,
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Export the derived table as CSV
    Export {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, default_value = "ranked.csv")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Case-insensitive match on name, enrolment number or APAAR id
    #[arg(long, default_value = "")]
    search: String,
    /// `overall` or a branch code
    #[arg(long, default_value = "overall")]
    scope: Scope,
    /// Column to order by: name, enrolment, apaar, cgpa or branch
    #[arg(long)]
    sort: Option<SortKey>,
    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,
}

impl ViewArgs {
    /// Builds the view as if the sort column had been clicked once, or twice
    /// for `--desc`.
    fn state(&self, config: &DashboardConfig) -> ViewState {
        let mut state = ViewState::default()
            .with_search(self.search.clone())
            .with_scope(config.resolve_scope(self.scope.clone()));
        if let Some(key) = self.sort {
            state = state.select_column(key);
            if self.desc {
                state = state.select_column(key);
            }
        }
        state
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = DashboardConfig::new(cli.data.clone(), &cli.branches, cli.layout.as_deref())
        .context("invalid configuration")?;
    debug!(branches = ?config.branches, data = %config.data_path.display(), "configuration loaded");

    match cli.command {
        Commands::Seed => {
            let written = dataset::write_sample(&config.data_path)?;
            println!(
                "Wrote {written} sample students to {}.",
                config.data_path.display()
            );
        }
        Commands::Stats { format } => {
            let records = load(&config)?;
            let aggregates = compute_aggregates(&records, &config.branches);

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&aggregates)?),
                Format::Text => {
                    let overall = &aggregates.overall;
                    println!("Total students: {}", overall.total_students);
                    println!("Overall average CGPA: {}", overall.overall_avg_cgpa);
                    println!("Highest CGPA: {}", overall.highest_cgpa);
                    println!("Lowest CGPA: {}", overall.lowest_cgpa);
                    println!("Branch averages:");
                    for branch in aggregates.per_branch.iter() {
                        println!(
                            "- {}: {:.2} across {} graded students",
                            branch.branch, branch.average_cgpa, branch.student_count
                        );
                    }
                }
            }
        }
        Commands::Table {
            view,
            limit,
            format,
        } => {
            let records = load(&config)?;
            let state = view.state(&config);
            warn_unknown_scope(&config, &state.scope);
            let rows = derive_view(&records, &state);

            match format {
                Format::Json => {
                    let shown: Vec<&RankedRecord> = rows.iter().take(limit).collect();
                    println!("{}", serde_json::to_string_pretty(&shown)?);
                }
                Format::Text => print_table(&rows, limit),
            }
        }
        Commands::Lookup { enrolment } => {
            let records = load(&config)?;
            match dataset::find_by_enrolment(&records, &enrolment)? {
                Some(record) => {
                    println!("Student: {}", record.name);
                    println!("Enrolment No.: {}", record.enrolment_no);
                    println!("CGPA: {}", record.cgpa);
                }
                None => {
                    eprintln!("Enrolment number {enrolment} not found.");
                    std::process::exit(1);
                }
            }
        }
        Commands::Report { scope, top, out } => {
            let records = load(&config)?;
            let scope = config.resolve_scope(scope);
            warn_unknown_scope(&config, &scope);
            let aggregates = compute_aggregates(&records, &config.branches);
            let ranked = cgpa_dashboard::rank(&records, &scope);
            let report = report::build_report(&scope, chrono::Utc::now(), &aggregates, &ranked, top);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { view, out } => {
            let records = load(&config)?;
            let state = view.state(&config);
            warn_unknown_scope(&config, &state.scope);
            let rows = derive_view(&records, &state);
            let written = export::export_csv(&out, &rows)?;
            println!("Exported {written} students to {}.", out.display());
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn load(config: &DashboardConfig) -> anyhow::Result<Vec<StudentRecord>> {
    let records = dataset::load_snapshot(&config.data_path, &config.layout).with_context(|| {
        format!(
            "failed to load student data from {} (run `seed` for a sample)",
            config.data_path.display()
        )
    })?;

    let unknown = records
        .iter()
        .filter(|record| !config.is_known_branch(&record.branch))
        .count();
    if unknown > 0 {
        warn!(
            records = unknown,
            "records outside the known branch list are left out of branch views"
        );
    }

    Ok(records)
}

fn warn_unknown_scope(config: &DashboardConfig, scope: &Scope) {
    if let Scope::Branch(code) = scope {
        if !config.is_known_branch(code) {
            warn!(branch = %code, "scope is not a known branch");
        }
    }
}

fn print_table(rows: &[RankedRecord], limit: usize) {
    if rows.is_empty() {
        println!("No students match this view.");
        return;
    }

    println!(
        "{:>4}  {:<28} {:<14} {:>6}  {}",
        "Rank", "Student Name", "Enrolment No.", "CGPA", "Branch"
    );
    for row in rows.iter().take(limit) {
        println!(
            "{:>4}  {:<28} {:<14} {:>6}  {}",
            row.rank,
            row.record.name,
            row.record.enrolment_no,
            row.record.cgpa.to_string(),
            row.record.branch
        );
    }
    if rows.len() > limit {
        println!("... {} more", rows.len() - limit);
    }
}
