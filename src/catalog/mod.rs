// Movie catalog — the titles, genres and normalized titles the resolver
// searches, in source-file order.

pub mod loader;
pub mod resolve;

use std::collections::HashMap;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::Serialize;
use tracing::warn;

/// A single movie as loaded from the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub movie_id: u32,
    /// Canonical title, unique within a catalog (e.g. "Heat (1995)")
    pub title: String,
    /// The title with everything but ASCII letters, digits and spaces removed
    pub clean_title: String,
    /// Genre tags in source order
    pub genres: Vec<String>,
}

impl Movie {
    pub fn new(movie_id: u32, title: impl Into<String>, genres: Vec<String>) -> Self {
        let title = title.into();
        Self {
            movie_id,
            clean_title: clean_title(&title),
            title,
            genres,
        }
    }

    /// Genre tags joined by single spaces — the document the content
    /// similarity space is built from.
    pub fn genre_text(&self) -> String {
        self.genres.join(" ")
    }
}

/// Strip every character that isn't an ASCII letter, digit or space.
///
/// Case is preserved. Applied to catalog titles at load time and to every
/// query before matching.
pub fn clean_title(title: &str) -> String {
    static NON_TITLE_CHARS: OnceLock<Regex> = OnceLock::new();
    let re = NON_TITLE_CHARS
        .get_or_init(|| Regex::new("[^a-zA-Z0-9 ]").expect("title pattern is valid"));
    re.replace_all(title, "").into_owned()
}

/// Ordered, immutable collection of movies keyed by unique title.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    by_title: HashMap<String, usize>,
    /// movie_id -> position, including ids of dropped duplicate rows
    by_id: HashMap<u32, usize>,
}

impl Catalog {
    /// Build a catalog, keeping the first movie for any repeated title.
    ///
    /// Title uniqueness is what lets the similarity indices be bijections,
    /// so later duplicates are dropped rather than kept as ambiguous rows.
    /// Their ids still resolve to the kept movie, so ratings recorded
    /// against either row land on the same title.
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut kept: Vec<Movie> = Vec::with_capacity(movies.len());
        let mut by_title = HashMap::with_capacity(movies.len());
        let mut by_id = HashMap::with_capacity(movies.len());
        let mut dropped = 0usize;

        for movie in movies {
            if let Some(&pos) = by_title.get(&movie.title) {
                warn!(title = %movie.title, movie_id = movie.movie_id, "Dropping duplicate catalog title");
                by_id.entry(movie.movie_id).or_insert(pos);
                dropped += 1;
                continue;
            }
            let pos = kept.len();
            by_title.insert(movie.title.clone(), pos);
            by_id.entry(movie.movie_id).or_insert(pos);
            kept.push(movie);
        }

        if dropped > 0 {
            warn!(dropped, "Catalog contained duplicate titles");
        }

        Self {
            movies: kept,
            by_title,
            by_id,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Look up a movie by its exact canonical title.
    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.by_title.get(title).map(|&pos| &self.movies[pos])
    }

    /// Look up a movie by source id.
    pub fn by_movie_id(&self, movie_id: u32) -> Option<&Movie> {
        self.by_id.get(&movie_id).map(|&pos| &self.movies[pos])
    }

    /// Every title in catalog order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title_strips_punctuation() {
        assert_eq!(clean_title("Heat (1995)"), "Heat 1995");
        assert_eq!(clean_title("Se7en: Director's Cut!"), "Se7en Directors Cut");
    }

    #[test]
    fn test_clean_title_drops_non_ascii() {
        assert_eq!(clean_title("Amélie (2001)"), "Amlie 2001");
    }

    #[test]
    fn test_genre_text_joins_with_spaces() {
        let movie = Movie::new(
            1,
            "Toy Story (1995)",
            vec!["Adventure".into(), "Animation".into(), "Children".into()],
        );
        assert_eq!(movie.genre_text(), "Adventure Animation Children");
        assert_eq!(movie.clean_title, "Toy Story 1995");
    }

    #[test]
    fn test_catalog_keeps_first_duplicate() {
        let catalog = Catalog::new(vec![
            Movie::new(1, "Emma (1996)", vec!["Comedy".into()]),
            Movie::new(2, "Heat (1995)", vec!["Action".into()]),
            Movie::new(3, "Emma (1996)", vec!["Drama".into()]),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Emma (1996)").map(|m| m.movie_id), Some(1));
        assert_eq!(
            catalog.by_movie_id(3).map(|m| m.title.as_str()),
            Some("Emma (1996)")
        );
        assert!(catalog.by_movie_id(99).is_none());
    }
}
