use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::scoring::hybrid::GenreWeight;

pub const DEFAULT_MOVIES_PATH: &str = "data/movies.csv";
pub const DEFAULT_RATINGS_PATH: &str = "data/ratings.csv";
pub const DEFAULT_TOP_N: usize = 5;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command-line
/// flags override the recommendation defaults per invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// MovieLens-style movies file (movieId,title,genres)
    pub movies_path: PathBuf,
    /// MovieLens-style ratings file (userId,movieId,rating,timestamp)
    pub ratings_path: PathBuf,
    /// How many recommendations to show (CINEMATCH_TOP_N, default 5)
    pub top_n: usize,
    /// Content vs. collaborative blend (CINEMATCH_GENRE_WEIGHT, default 0.5)
    pub genre_weight: GenreWeight,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only malformed numbers are errors.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let top_n: usize = match lookup("CINEMATCH_TOP_N") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CINEMATCH_TOP_N must be a whole number, got '{raw}'"))?,
            None => DEFAULT_TOP_N,
        };

        let genre_weight = match lookup("CINEMATCH_GENRE_WEIGHT") {
            Some(raw) => {
                let weight: f64 = raw.trim().parse().with_context(|| {
                    format!("CINEMATCH_GENRE_WEIGHT must be a number, got '{raw}'")
                })?;
                GenreWeight::new(weight).context("Invalid CINEMATCH_GENRE_WEIGHT")?
            }
            None => GenreWeight::default(),
        };

        Ok(Self {
            movies_path: lookup("CINEMATCH_MOVIES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MOVIES_PATH)),
            ratings_path: lookup("CINEMATCH_RATINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RATINGS_PATH)),
            top_n,
            genre_weight,
        })
    }

    /// Check that both data files exist.
    /// Call this before building artifacts.
    pub fn require_data(&self) -> Result<()> {
        for (path, var) in [
            (&self.movies_path, "CINEMATCH_MOVIES_PATH"),
            (&self.ratings_path, "CINEMATCH_RATINGS_PATH"),
        ] {
            if !path.exists() {
                anyhow::bail!(
                    "Data file not found: {}\n\
                     Download the MovieLens small dataset into ./data, or set {var} in your .env file.",
                    path.display()
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.movies_path, PathBuf::from(DEFAULT_MOVIES_PATH));
        assert_eq!(config.ratings_path, PathBuf::from(DEFAULT_RATINGS_PATH));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.genre_weight.value(), 0.5);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("CINEMATCH_MOVIES_PATH", "/srv/movies.csv"),
            ("CINEMATCH_TOP_N", " 10 "),
            ("CINEMATCH_GENRE_WEIGHT", "0.8"),
        ]))
        .unwrap();
        assert_eq!(config.movies_path, PathBuf::from("/srv/movies.csv"));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.genre_weight.value(), 0.8);
    }

    #[test]
    fn test_bad_numbers_name_the_variable() {
        let err = Config::from_lookup(lookup(&[("CINEMATCH_TOP_N", "five")])).unwrap_err();
        assert!(err.to_string().contains("CINEMATCH_TOP_N"));

        let err = Config::from_lookup(lookup(&[("CINEMATCH_GENRE_WEIGHT", "2.0")])).unwrap_err();
        assert!(err.to_string().contains("CINEMATCH_GENRE_WEIGHT"));
    }

    #[test]
    fn test_require_data_reports_missing_file() {
        let missing = std::env::temp_dir().join("cinematch-test-nonexistent.csv");
        let config = Config {
            movies_path: missing.clone(),
            ratings_path: missing,
            top_n: 5,
            genre_weight: GenreWeight::default(),
        };
        let err = config.require_data().unwrap_err();
        assert!(err.to_string().contains("CINEMATCH_MOVIES_PATH"));
    }
}
