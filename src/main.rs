use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use cinematch::artifacts::Artifacts;
use cinematch::config::Config;
use cinematch::scoring::hybrid::GenreWeight;
use cinematch::session::{SessionInput, HELP};

/// Cinematch: hybrid movie recommendations.
///
/// Blends genre similarity with what other users rated alike to suggest
/// movies similar to one you enjoyed.
#[derive(Parser)]
#[command(name = "cinematch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// The movie you enjoyed (exact or partial title)
        title: String,

        /// How many recommendations to show (default: CINEMATCH_TOP_N or 5)
        #[arg(long, short = 'n')]
        top_n: Option<usize>,

        /// Genre influence from 0.0 (ratings only) to 1.0 (genres only)
        #[arg(long, short = 'w')]
        genre_weight: Option<f64>,

        /// Print the scored recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every catalog title matching a query
    Search {
        /// Exact or partial title
        query: String,
    },

    /// Ask for recommendations repeatedly without rebuilding
    Interactive {
        /// Starting genre weight (default: CINEMATCH_GENRE_WEIGHT or 0.5)
        #[arg(long, short = 'w')]
        genre_weight: Option<f64>,
    },

    /// Show data files and similarity space sizes
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cinematch=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Recommend {
            title,
            top_n,
            genre_weight,
            json,
        } => {
            let top_n = top_n.unwrap_or(config.top_n);
            let genre_weight = match genre_weight {
                Some(w) => GenreWeight::new(w)?,
                None => config.genre_weight,
            };
            let artifacts = load_artifacts(&config)?;

            match artifacts.recommend(&title, top_n, genre_weight) {
                Ok(report) if json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                Ok(report) => {
                    cinematch::output::terminal::display_recommendations(
                        &report,
                        artifacts.catalog(),
                    );
                }
                Err(e) if json => {
                    let body = serde_json::json!({ "query": title, "error": e.to_string() });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(e) => cinematch::output::terminal::display_not_found(&e),
            }
        }

        Commands::Search { query } => {
            let artifacts = load_artifacts(&config)?;
            let matches =
                cinematch::catalog::resolve::matching_movies(&query, artifacts.catalog());
            let resolved = artifacts.resolve(&query).ok();
            cinematch::output::terminal::display_matches(&query, &matches, resolved.as_deref());
        }

        Commands::Interactive { genre_weight } => {
            let genre_weight = match genre_weight {
                Some(w) => GenreWeight::new(w)?,
                None => config.genre_weight,
            };
            run_session(&config, genre_weight)?;
        }

        Commands::Status => {
            if let Err(e) = config.require_data() {
                cinematch::status::show_files(&config);
                println!("\n{e}");
                return Ok(());
            }
            let artifacts = load_artifacts(&config)?;
            cinematch::status::show(&config, &artifacts);
        }
    }

    Ok(())
}

/// Get the process-wide artifacts, building them on first use.
fn load_artifacts(config: &Config) -> Result<Arc<Artifacts>> {
    cinematch::cache::get_or_build(|| {
        config.require_data()?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner} {msg} ({elapsed})")
                .expect("valid template"),
        );
        pb.set_message("Crunching numbers and finding cinematic gems...");
        pb.enable_steady_tick(Duration::from_millis(120));

        let result = Artifacts::load(&config.movies_path, &config.ratings_path);
        pb.finish_and_clear();
        result
    })
}

/// Read queries from stdin until EOF or :quit.
fn run_session(config: &Config, mut genre_weight: GenreWeight) -> Result<()> {
    let mut artifacts = load_artifacts(config)?;
    let mut top_n = config.top_n;

    println!(
        "{}",
        format!("Cinematch ready: {} movies loaded.", artifacts.catalog().len()).bold()
    );
    println!("{}", HELP.dimmed());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\n{} ", ">".cyan().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };

        match SessionInput::parse(&line?) {
            Ok(SessionInput::Query(query)) => {
                match artifacts.recommend(&query, top_n, genre_weight) {
                    Ok(report) => cinematch::output::terminal::display_recommendations(
                        &report,
                        artifacts.catalog(),
                    ),
                    Err(e) => cinematch::output::terminal::display_not_found(&e),
                }
            }
            Ok(SessionInput::SetWeight(w)) => {
                genre_weight = w;
                println!("Genre weight set to {:.2}", w.value());
            }
            Ok(SessionInput::SetTopN(n)) => {
                top_n = n;
                println!("Showing up to {n} recommendations");
            }
            Ok(SessionInput::Reload) => {
                cinematch::cache::clear();
                match load_artifacts(config) {
                    Ok(fresh) => {
                        info!(movies = fresh.catalog().len(), "Reloaded artifacts");
                        artifacts = fresh;
                        println!("Reloaded {} movies.", artifacts.catalog().len());
                    }
                    Err(e) => {
                        // Keep serving from the set we already have
                        warn!(error = %e, "Reload failed");
                        cinematch::cache::replace(Arc::clone(&artifacts));
                        println!("{} {e}", "Reload failed:".red());
                    }
                }
            }
            Ok(SessionInput::Help) => println!("{HELP}"),
            Ok(SessionInput::Quit) => break,
            Ok(SessionInput::Empty) => {}
            Err(e) => println!("{} {e}", "Error:".red()),
        }
    }

    Ok(())
}
