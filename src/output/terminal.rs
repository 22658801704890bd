// Colored terminal output for recommendations and title searches.
//
// This module handles all terminal-specific formatting. The main.rs commands
// delegate here.

use colored::Colorize;

use crate::catalog::{Catalog, Movie};
use crate::error::ResolveError;
use crate::scoring::hybrid::RecommendationReport;

const TITLE_WIDTH: usize = 48;

/// Display ranked recommendations with each movie's genres.
pub fn display_recommendations(report: &RecommendationReport, catalog: &Catalog) {
    for warning in &report.warnings {
        println!("  {} '{}' {}", "Warning:".yellow(), report.seed, warning);
    }

    if report.recommendations.is_empty() {
        println!(
            "No recommendations found for this movie. Try a different movie or adjust the genre weight."
        );
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Movies similar to {} (genre weight {:.1}) ===",
            report.seed,
            report.genre_weight.value()
        )
        .bold()
    );
    println!();

    println!(
        "  {:>4}  {:<width$} {:>6}  {:>6}  {:>6}",
        "Rank".dimmed(),
        "Title".dimmed(),
        "Score".dimmed(),
        "Genre".dimmed(),
        "Users".dimmed(),
        width = TITLE_WIDTH,
    );
    println!("  {}", "-".repeat(TITLE_WIDTH + 30).dimmed());

    for (i, rec) in report.recommendations.iter().enumerate() {
        let title = super::truncate_chars(&rec.title, TITLE_WIDTH - 3);
        println!(
            "  {:>4}. {:<width$} {:>6.3}  {}  {}",
            i + 1,
            title.bold(),
            rec.score,
            format_component(rec.content_score),
            format_component(rec.collaborative_score),
            width = TITLE_WIDTH,
        );
        if let Some(movie) = catalog.get(&rec.title) {
            println!("        {}", format_genres(movie).dimmed());
        }
    }
    println!();
}

/// Display every title a query matches, marking the one it resolves to.
pub fn display_matches(query: &str, matches: &[&Movie], resolved: Option<&str>) {
    if matches.is_empty() {
        display_not_found(&ResolveError::NotFound {
            query: query.to_string(),
        });
        return;
    }

    println!(
        "\n{}",
        format!("=== {} titles match '{}' ===", matches.len(), query).bold()
    );
    for movie in matches {
        let marker = if Some(movie.title.as_str()) == resolved {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "  {} {:<width$} {}",
            marker,
            movie.title,
            format_genres(movie).dimmed(),
            width = TITLE_WIDTH,
        );
    }
    if let Some(title) = resolved {
        println!("\n  {} resolves to {}", "*".green().bold(), title.bold());
    }
}

/// Display the not-found message for a failed resolution.
pub fn display_not_found(err: &ResolveError) {
    println!("{}", err.to_string().yellow());
}

fn format_component(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:>6.3}", s),
        None => format!("{:>6}", "-"),
    }
}

fn format_genres(movie: &Movie) -> String {
    format!("Genre: {}", movie.genres.join(", "))
}
