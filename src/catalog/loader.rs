// CSV loading for the MovieLens-style movie and rating files.
//
// movies.csv:  movieId,title,genres      (genres are '|' separated)
// ratings.csv: userId,movieId,rating,timestamp

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Catalog, Movie};

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: u32,
    title: String,
    genres: String,
}

/// One user's rating of one movie. Extra columns (timestamp) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "userId")]
    pub user_id: u32,
    #[serde(rename = "movieId")]
    pub movie_id: u32,
    pub rating: f64,
}

/// Load the movie catalog from a CSV file.
pub fn load_movies(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open movies file: {}", path.display()))?;
    let catalog = read_movies(file)
        .with_context(|| format!("Failed to parse movies file: {}", path.display()))?;
    info!(movies = catalog.len(), path = %path.display(), "Loaded movie catalog");
    Ok(catalog)
}

/// Load every rating from a CSV file.
pub fn load_ratings(path: &Path) -> Result<Vec<Rating>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open ratings file: {}", path.display()))?;
    let ratings = read_ratings(file)
        .with_context(|| format!("Failed to parse ratings file: {}", path.display()))?;
    info!(ratings = ratings.len(), path = %path.display(), "Loaded ratings");
    Ok(ratings)
}

/// Parse movies from any reader producing CSV with a header row.
pub fn read_movies<R: Read>(reader: R) -> Result<Catalog> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut movies = Vec::new();

    for (line, record) in csv_reader.deserialize::<MovieRecord>().enumerate() {
        let record = record.with_context(|| format!("Bad movie record at row {}", line + 1))?;
        let genres = record.genres.split('|').map(str::to_string).collect();
        movies.push(Movie::new(record.movie_id, record.title, genres));
    }

    Ok(Catalog::new(movies))
}

/// Parse ratings from any reader producing CSV with a header row.
pub fn read_ratings<R: Read>(reader: R) -> Result<Vec<Rating>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ratings = Vec::new();

    for (line, record) in csv_reader.deserialize::<Rating>().enumerate() {
        ratings.push(record.with_context(|| format!("Bad rating record at row {}", line + 1))?);
    }

    Ok(ratings)
}
