//! Wiki Planner - Main Entry Point
//!
//! Command-line front end for the `wiki_planner` library. All planner
//! behavior lives in the library; this binary loads the wiki, runs one
//! operation and persists the result.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use wiki_planner::config::CONFIG_FILE_NAME;
use wiki_planner::{
    Config, GitOps, Outcome, PlannerError, WikiStore, advance, resolve, tasks,
};

/// Wiki Planner - roll plain-text day/week/month/quarter/year logs forward
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the wiki directory
    #[arg(long, default_value = ".")]
    wiki: PathBuf,

    /// Configuration file (defaults to planner-config.toml in the wiki)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new planner with fresh logs for every period
    Init {
        /// First day of the planner (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Resolve a date expression and print its canonical form
    Resolve {
        expression: String,
        /// Reference date for relative expressions (YYYY-MM-DD); defaults to today
        #[arg(long)]
        reference: Option<NaiveDate>,
    },
    /// Normalize blocked tasks and move them under SCHEDULED
    Schedule,
    /// Schedule tasks, then advance the planner past the current day
    Advance {
        /// Wall-clock time to advance to ("YYYY-MM-DD HH:MM"); defaults to now
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,
        /// Report what would happen without writing anything
        #[arg(long)]
        simulate: bool,
        /// Skip the NOTES completion check
        #[arg(long)]
        lax: bool,
        /// Allow an empty TOMORROW section
        #[arg(long)]
        lax_tomorrow: bool,
    },
    /// Show the done/undone/blocked tasks on today's agenda
    Agenda,
    /// Show the current date and documents
    Status,
}

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("Invalid time '{}'. Use \"YYYY-MM-DD HH:MM\"", s))
}

fn main() -> ExitCode {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

/// Print an error and pick the exit code: 3 when the caller can relax a
/// check or finish a log and retry, 1 otherwise
fn report(err: anyhow::Error) -> ExitCode {
    let outcome = err.downcast_ref::<PlannerError>().cloned().map(Outcome::from);
    match outcome {
        Some(outcome @ Outcome::Recoverable(_)) => {
            eprintln!("Error: {}", outcome.error());
            if let Some(hint) = outcome.hint() {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::from(3)
        }
        _ => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let store = WikiStore::new(&args.wiki);
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.wiki.join(CONFIG_FILE_NAME));
    let config = Config::load(&config_path)?;
    let git = GitOps::new(store.root());
    let today = Local::now().date_naive();

    match args.command {
        Command::Init { date } => {
            let start = date.unwrap_or(today);
            let mut state = store.load_sources(start)?;
            advance::initialize(&mut state, start, &config);
            let written = store.save_initialized(&state)?;
            if config.git_snapshot {
                git.snapshot(&written, &format!("Start planner on {}", start))?;
            }
            println!("Planner started on {}", start.format("%B %-d, %Y"));
        }

        Command::Resolve {
            expression,
            reference,
        } => {
            let resolved = resolve(&expression, Some(reference.unwrap_or(today)))?;
            println!("{}\t{}", resolved.canonical, resolved.date);
        }

        Command::Schedule => {
            let mut state = store.load()?;
            state.schedule_tasks()?;
            let written = store.save_scheduled(&state)?;
            if config.git_snapshot {
                git.snapshot(&written, "Schedule blocked tasks")?;
            }
            println!("Scheduled tasks ({} file(s) updated)", written.len());
        }

        Command::Advance {
            now,
            simulate,
            lax,
            lax_tomorrow,
        } => {
            let mut config = config;
            if lax {
                config = config.lax_completion();
            }
            if lax_tomorrow {
                config = config.lax_tomorrow();
            }
            let now = now.unwrap_or_else(|| Local::now().naive_local());

            let state = store.load()?;
            let (next, advance) = state.simulate(now, &config)?;
            store.check_new_documents(&advance)?;

            let created: Vec<&str> = advance.created.iter().map(|p| p.as_str()).collect();
            if simulate {
                println!(
                    "Would advance to {} ({}); new logs: {}",
                    advance.next_date.format("%B %-d, %Y"),
                    advance.decision,
                    created.join(", ")
                );
                return Ok(());
            }

            let written = store
                .save_advance(&next, &advance)
                .context("Failed to save the advanced planner")?;
            if config.git_snapshot {
                git.snapshot(
                    &written,
                    &format!(
                        "Advance planner to {} ({})",
                        advance.next_date.format("%B %-d, %Y"),
                        advance.decision
                    ),
                )?;
            }
            println!(
                "Advanced to {} ({}); new logs: {}",
                advance.next_date.format("%B %-d, %Y"),
                advance.decision,
                created.join(", ")
            );
        }

        Command::Agenda => {
            let state = store.load()?;
            let agenda = tasks::extract_agenda(&state.day_log)?;
            for (label, count, bucket) in [
                ("Done", agenda.done_count(), &agenda.done),
                ("Undone", agenda.undone_count(), &agenda.undone),
                ("Blocked", agenda.blocked_count(), &agenda.blocked),
            ] {
                println!("{} ({}):", label, count);
                print!("{}", bucket);
            }
        }

        Command::Status => {
            let pointers = store.load_pointers()?;
            println!("Current date: {}", pointers.current_date.format("%A, %B %-d, %Y"));
            for period in wiki_planner::Period::ALL {
                println!("  {:<8} {}", period.as_str(), pointers.get(period));
            }
        }
    }

    Ok(())
}
