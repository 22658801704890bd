// Content similarity — TF-IDF over each movie's genre text.
//
// Each movie is one document: its genre tags joined by spaces. Terms are
// lowercased runs of two or more word characters with English stop words
// removed. Weights are raw term count times a smoothed IDF,
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
// and every document vector is L2-normalized, so cosine similarity is a
// plain dot product. Catalogs repeat the same genre combination many times,
// so vectors and pairwise similarities are computed once per distinct genre
// text and then expanded to the full movie × movie matrix.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};
use tracing::info;

use super::matrix::{SimilarityMatrix, SimilaritySpace, TitleIndex};
use crate::catalog::Catalog;
use crate::error::ArtifactError;

/// Sparse L2-normalized TF-IDF vector, sorted by term id.
type SparseVector = Vec<(usize, f64)>;

/// Builds the genre-based content similarity space.
pub struct GenreTfIdf {
    stop_words: HashSet<String>,
}

/// Genre vocabulary terms that must survive stop-word filtering. The crate's
/// English list is broader than the classic IR list and would otherwise eat
/// the "fi" of Sci-Fi.
const GENRE_TERMS: &[&str] = &[
    "action",
    "adventure",
    "animation",
    "children",
    "comedy",
    "crime",
    "documentary",
    "drama",
    "fantasy",
    "fi",
    "film",
    "genres",
    "horror",
    "imax",
    "listed",
    "musical",
    "mystery",
    "noir",
    "romance",
    "sci",
    "thriller",
    "war",
    "western",
];

impl Default for GenreTfIdf {
    fn default() -> Self {
        let mut stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        for term in GENRE_TERMS {
            stop_words.remove(*term);
        }
        // "(no genres listed)" carries no genre signal
        stop_words.insert("no".to_string());
        Self { stop_words }
    }
}

impl GenreTfIdf {
    /// Use a custom stop word list instead of the English default.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Split text into lowercased terms, dropping stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        static TERM: OnceLock<Regex> = OnceLock::new();
        let re = TERM.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("term pattern is valid"));

        let lower = text.to_lowercase();
        re.find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Build the content space over every movie in the catalog, in catalog
    /// order.
    pub fn build(&self, catalog: &Catalog) -> Result<SimilaritySpace, ArtifactError> {
        let n = catalog.len();

        // Group movies by identical genre text
        let mut group_of_text: HashMap<String, usize> = HashMap::new();
        let mut group_texts: Vec<String> = Vec::new();
        let mut group_sizes: Vec<usize> = Vec::new();
        let movie_groups: Vec<usize> = catalog
            .movies()
            .iter()
            .map(|movie| {
                let text = movie.genre_text();
                let next = group_texts.len();
                let group = *group_of_text.entry(text.clone()).or_insert(next);
                if group == next {
                    group_texts.push(text);
                    group_sizes.push(0);
                }
                group_sizes[group] += 1;
                group
            })
            .collect();

        // Term counts per distinct text, with a shared vocabulary
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let group_counts: Vec<HashMap<usize, usize>> = group_texts
            .iter()
            .map(|text| {
                let mut counts = HashMap::new();
                for term in self.tokenize(text) {
                    let next = vocabulary.len();
                    let id = *vocabulary.entry(term).or_insert(next);
                    *counts.entry(id).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        // Document frequency counts every movie, not every distinct text
        let mut df = vec![0usize; vocabulary.len()];
        for (counts, &size) in group_counts.iter().zip(&group_sizes) {
            for &term in counts.keys() {
                df[term] += size;
            }
        }
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n as f64) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let vectors: Vec<SparseVector> = group_counts
            .iter()
            .map(|counts| tfidf_vector(counts, &idf))
            .collect();

        // Pairwise similarity between distinct genre texts
        let groups = vectors.len();
        let mut group_sim = vec![0.0f32; groups * groups];
        for a in 0..groups {
            for b in a..groups {
                let sim = sparse_dot(&vectors[a], &vectors[b]).clamp(0.0, 1.0) as f32;
                group_sim[a * groups + b] = sim;
                group_sim[b * groups + a] = sim;
            }
        }

        let mut values = Vec::with_capacity(n * n);
        for &gi in &movie_groups {
            let row = &group_sim[gi * groups..(gi + 1) * groups];
            values.extend(movie_groups.iter().map(|&gj| row[gj]));
        }

        info!(
            movies = n,
            distinct_genre_sets = groups,
            vocabulary = vocabulary.len(),
            "Built content similarity space"
        );

        let matrix = SimilarityMatrix::new(n, values)?;
        let index = TitleIndex::new(catalog.titles().map(str::to_string).collect())?;
        SimilaritySpace::new(matrix, index)
    }
}

/// Weight term counts by IDF and L2-normalize. Empty documents stay empty.
fn tfidf_vector(counts: &HashMap<usize, usize>, idf: &[f64]) -> SparseVector {
    let mut vector: SparseVector = counts
        .iter()
        .map(|(&term, &count)| (term, count as f64 * idf[term]))
        .collect();
    vector.sort_by_key(|&(term, _)| term);

    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm < f64::EPSILON {
        return Vec::new();
    }
    for (_, w) in &mut vector {
        *w /= norm;
    }
    vector
}

/// Dot product of two term-sorted sparse vectors.
fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Movie;

    fn movie(id: u32, title: &str, genres: &[&str]) -> Movie {
        Movie::new(id, title, genres.iter().map(|g| g.to_string()).collect())
    }

    #[test]
    fn test_tokenize_lowercases_and_splits_hyphens() {
        let tfidf = GenreTfIdf::with_stop_words(Vec::<String>::new());
        assert_eq!(tfidf.tokenize("Sci-Fi Film-Noir"), vec!["sci", "fi", "film", "noir"]);
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_single_chars() {
        let tfidf = GenreTfIdf::with_stop_words(["no"]);
        assert_eq!(tfidf.tokenize("(no genres listed) a"), vec!["genres", "listed"]);
    }

    #[test]
    fn test_default_stop_words_keep_genre_terms() {
        let tfidf = GenreTfIdf::default();
        assert_eq!(tfidf.tokenize("Sci-Fi"), vec!["sci", "fi"]);
        assert_eq!(tfidf.tokenize("Film-Noir|IMAX|War"), vec!["film", "noir", "imax", "war"]);
        assert_eq!(tfidf.tokenize("(no genres listed)"), vec!["genres", "listed"]);
    }

    #[test]
    fn test_identical_genres_score_one() {
        let catalog = Catalog::new(vec![
            movie(1, "A", &["Action"]),
            movie(2, "B", &["Action"]),
            movie(3, "C", &["Comedy"]),
        ]);
        let space = GenreTfIdf::with_stop_words(Vec::<String>::new())
            .build(&catalog)
            .unwrap();
        let m = space.matrix();
        assert!((m.get(0, 1).unwrap() - 1.0).abs() < 1e-6);
        assert!(m.get(0, 2).unwrap().abs() < 1e-6);
        assert!((m.get(2, 2).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_overlap_is_between_zero_and_one() {
        let catalog = Catalog::new(vec![
            movie(1, "A", &["Action", "Crime"]),
            movie(2, "B", &["Action", "Comedy"]),
            movie(3, "C", &["Drama"]),
        ]);
        let space = GenreTfIdf::with_stop_words(Vec::<String>::new())
            .build(&catalog)
            .unwrap();
        let sim = space.matrix().get(0, 1).unwrap();
        assert!(sim > 0.0 && sim < 1.0, "expected partial overlap, got {sim}");
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let catalog = Catalog::new(vec![
            movie(1, "A", &["Action", "Thriller"]),
            movie(2, "B", &["Thriller"]),
            movie(3, "C", &["Action", "Comedy", "Romance"]),
        ]);
        let space = GenreTfIdf::default().build(&catalog).unwrap();
        let m = space.matrix();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_rare_shared_term_outweighs_common_one() {
        // "drama" is everywhere, "western" is rare: sharing the rare term
        // should count for more.
        let catalog = Catalog::new(vec![
            movie(1, "A", &["Drama", "Western"]),
            movie(2, "B", &["Drama", "Western"]),
            movie(3, "C", &["Drama", "Romance"]),
            movie(4, "D", &["Drama"]),
            movie(5, "E", &["Drama", "Comedy"]),
        ]);
        let space = GenreTfIdf::with_stop_words(Vec::<String>::new())
            .build(&catalog)
            .unwrap();
        let m = space.matrix();
        assert!(m.get(0, 1).unwrap() > m.get(0, 2).unwrap());
    }

    #[test]
    fn test_empty_document_has_no_similarity() {
        let catalog = Catalog::new(vec![movie(1, "A", &["the"]), movie(2, "B", &["Action"])]);
        let space = GenreTfIdf::with_stop_words(["the"]).build(&catalog).unwrap();
        assert_eq!(space.matrix().get(0, 0), Some(0.0));
        assert_eq!(space.matrix().get(0, 1), Some(0.0));
    }

    #[test]
    fn test_empty_catalog_builds_empty_space() {
        let space = GenreTfIdf::default().build(&Catalog::default()).unwrap();
        assert!(space.is_empty());
    }

    #[test]
    fn test_sparse_dot_skips_disjoint_terms() {
        let a = vec![(0, 0.6), (2, 0.8)];
        let b = vec![(1, 1.0), (2, 0.5)];
        assert!((sparse_dot(&a, &b) - 0.4).abs() < 1e-12);
    }
}
