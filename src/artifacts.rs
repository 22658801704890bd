// The full artifact set: catalog plus both similarity spaces.
//
// Building is the expensive part of the process (the content matrix is
// quadratic in catalog size). Everything here is read-only once built, and
// `cache` keeps one shared copy per process.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::catalog::loader::{self, Rating};
use crate::catalog::resolve::resolve_title;
use crate::catalog::Catalog;
use crate::error::{ArtifactError, ResolveError};
use crate::scoring::hybrid::{recommend_scored, GenreWeight, RecommendationReport};
use crate::similarity::collaborative::build_collaborative_space;
use crate::similarity::content::GenreTfIdf;
use crate::similarity::matrix::SimilaritySpace;

/// Summary counts for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtifactStats {
    pub movies: usize,
    pub rated_movies: usize,
    pub ratings: usize,
}

/// Catalog and similarity spaces, built together and never mutated.
#[derive(Debug, Clone)]
pub struct Artifacts {
    catalog: Catalog,
    content: SimilaritySpace,
    collaborative: SimilaritySpace,
    rating_count: usize,
}

impl Artifacts {
    /// Assemble prebuilt parts, checking every indexed title is in the
    /// catalog.
    pub fn from_parts(
        catalog: Catalog,
        content: SimilaritySpace,
        collaborative: SimilaritySpace,
        rating_count: usize,
    ) -> Result<Self, ArtifactError> {
        for title in content
            .index()
            .titles()
            .iter()
            .chain(collaborative.index().titles())
        {
            if catalog.get(title).is_none() {
                return Err(ArtifactError::UnknownTitle(title.clone()));
            }
        }
        Ok(Self {
            catalog,
            content,
            collaborative,
            rating_count,
        })
    }

    /// Build both similarity spaces from a catalog and its ratings.
    pub fn build(catalog: Catalog, ratings: &[Rating]) -> Result<Self, ArtifactError> {
        let started = Instant::now();
        let content = GenreTfIdf::default().build(&catalog)?;
        let collaborative = build_collaborative_space(&catalog, ratings)?;
        info!(
            movies = catalog.len(),
            rated_movies = collaborative.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built similarity spaces"
        );
        Self::from_parts(catalog, content, collaborative, ratings.len())
    }

    /// Load the CSV files and build everything.
    pub fn load(movies_path: &Path, ratings_path: &Path) -> Result<Self> {
        let catalog = loader::load_movies(movies_path)?;
        let ratings = loader::load_ratings(ratings_path)?;
        Ok(Self::build(catalog, &ratings)?)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn content(&self) -> &SimilaritySpace {
        &self.content
    }

    pub fn collaborative(&self) -> &SimilaritySpace {
        &self.collaborative
    }

    pub fn stats(&self) -> ArtifactStats {
        ArtifactStats {
            movies: self.catalog.len(),
            rated_movies: self.collaborative.len(),
            ratings: self.rating_count,
        }
    }

    /// Resolve a free-text query against the catalog.
    pub fn resolve(&self, query: &str) -> Result<String, ResolveError> {
        resolve_title(query, &self.catalog)
    }

    /// Resolve `query`, then score recommendations for the resolved title.
    pub fn recommend(
        &self,
        query: &str,
        top_n: usize,
        genre_weight: GenreWeight,
    ) -> Result<RecommendationReport, ResolveError> {
        let seed = self.resolve(query)?;
        Ok(recommend_scored(
            &seed,
            &self.content,
            &self.collaborative,
            top_n,
            genre_weight,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Movie;
    use crate::similarity::matrix::{SimilarityMatrix, TitleIndex};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Movie::new(1, "Heat (1995)", vec!["Action".into(), "Crime".into()]),
            Movie::new(2, "Heater Gone (1996)", vec!["Comedy".into()]),
            Movie::new(3, "Casino (1995)", vec!["Crime".into(), "Drama".into()]),
        ])
    }

    #[test]
    fn test_from_parts_rejects_unknown_titles() {
        let space = SimilaritySpace::new(
            SimilarityMatrix::zeros(1),
            TitleIndex::new(vec!["Ghost (1990)".to_string()]).unwrap(),
        )
        .unwrap();
        let err =
            Artifacts::from_parts(catalog(), SimilaritySpace::empty(), space, 0).unwrap_err();
        assert_eq!(err, ArtifactError::UnknownTitle("Ghost (1990)".to_string()));
    }

    #[test]
    fn test_recommend_resolves_partial_query() {
        let ratings = vec![
            Rating { user_id: 1, movie_id: 1, rating: 5.0 },
            Rating { user_id: 1, movie_id: 3, rating: 4.0 },
        ];
        let artifacts = Artifacts::build(catalog(), &ratings).unwrap();
        let report = artifacts.recommend("heat 1995", 5, GenreWeight::default()).unwrap();
        assert_eq!(report.seed, "Heat (1995)");
        // Casino shares a genre and a rater with Heat
        assert_eq!(report.recommendations[0].title, "Casino (1995)");
        assert!(!report.titles().contains(&"Heat (1995)".to_string()));
    }

    #[test]
    fn test_stats_count_everything() {
        let ratings = vec![Rating { user_id: 7, movie_id: 2, rating: 3.5 }];
        let artifacts = Artifacts::build(catalog(), &ratings).unwrap();
        assert_eq!(
            artifacts.stats(),
            ArtifactStats {
                movies: 3,
                rated_movies: 1,
                ratings: 1
            }
        );
    }
}
