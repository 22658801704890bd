// System status display — data files, catalog size, similarity space sizes.

use std::path::Path;

use crate::artifacts::Artifacts;
use crate::config::Config;
use crate::output::format_bytes;

/// Describe a data file: its path and size, or that it's missing.
pub fn describe_file(path: &Path) -> String {
    match std::fs::metadata(path) {
        Ok(meta) => format!("{} ({})", path.display(), format_bytes(meta.len())),
        Err(_) => format!("{} (missing)", path.display()),
    }
}

/// Display the data file status without building anything.
pub fn show_files(config: &Config) {
    println!("Movies file:  {}", describe_file(&config.movies_path));
    println!("Ratings file: {}", describe_file(&config.ratings_path));
}

/// Display dataset and similarity space sizes.
pub fn show(config: &Config, artifacts: &Artifacts) {
    show_files(config);

    let stats = artifacts.stats();
    println!(
        "Catalog: {} movies, {} ratings",
        stats.movies, stats.ratings
    );

    let content_dim = artifacts.content().matrix().dim();
    println!(
        "Content space: {content_dim} x {content_dim} (genre TF-IDF, {})",
        format_bytes(matrix_bytes(content_dim))
    );

    let collab_dim = artifacts.collaborative().matrix().dim();
    println!(
        "Collaborative space: {collab_dim} x {collab_dim} (rating cosine, {})",
        format_bytes(matrix_bytes(collab_dim))
    );

    let unrated = stats.movies.saturating_sub(stats.rated_movies);
    if unrated > 0 {
        println!("  {unrated} movies have no ratings and rank on genre alone");
    }

    println!(
        "Defaults: top {} recommendations, genre weight {:.1}",
        config.top_n,
        config.genre_weight.value()
    );
}

fn matrix_bytes(dim: usize) -> u64 {
    (dim * dim * std::mem::size_of::<f32>()) as u64
}
