// Hybrid scoring — blending content and collaborative similarity for a seed.
//
// For every movie that appears in either space's row for the seed:
//
//   combined = content * genre_weight + collaborative * (1 - genre_weight)
//
// with a missing score counting as 0 in its term. A movie known to only one
// space keeps a partial score rather than dropping out. Content-only scores
// are NOT renormalized when the seed has no ratings, so they stay scaled by
// genre_weight; that asymmetry is intentional and kept as-is.
//
// Ties on the combined score fall back to insertion order: content rows first
// in content-index order, then collaborative-only titles in collaborative
// index order. That order is implementation-defined, not part of the ranking
// contract.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ArtifactError;
use crate::similarity::matrix::SimilaritySpace;

/// How much the content space counts in the blend, validated to 0.0..=1.0.
///
/// 1.0 ranks purely by genre similarity, 0.0 purely by co-rating similarity.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct GenreWeight(f64);

impl GenreWeight {
    pub const PURE_CONTENT: GenreWeight = GenreWeight(1.0);
    pub const PURE_COLLABORATIVE: GenreWeight = GenreWeight(0.0);

    pub fn new(weight: f64) -> Result<Self, ArtifactError> {
        if (0.0..=1.0).contains(&weight) {
            Ok(Self(weight))
        } else {
            Err(ArtifactError::InvalidGenreWeight(weight))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for GenreWeight {
    fn default() -> Self {
        Self(0.5)
    }
}

impl TryFrom<f64> for GenreWeight {
    type Error = ArtifactError;

    fn try_from(weight: f64) -> Result<Self, Self::Error> {
        Self::new(weight)
    }
}

/// A seed that resolved but has no row in one of the spaces.
///
/// Not an error: scoring falls back on the other space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpaceWarning {
    MissingFromContentSpace,
    MissingFromCollaborativeSpace,
}

impl std::fmt::Display for SpaceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceWarning::MissingFromContentSpace => {
                write!(f, "not found in the genre index; relying on ratings only")
            }
            SpaceWarning::MissingFromCollaborativeSpace => {
                write!(f, "has no ratings; relying on genres only")
            }
        }
    }
}

/// One ranked recommendation with the parts of its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub score: f64,
    /// Similarity in the content space, if the movie has a row there
    pub content_score: Option<f64>,
    /// Similarity in the collaborative space, if the movie has a row there
    pub collaborative_score: Option<f64>,
}

/// Ranked recommendations for one seed plus any soft warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub seed: String,
    pub genre_weight: GenreWeight,
    pub recommendations: Vec<Recommendation>,
    pub warnings: Vec<SpaceWarning>,
}

impl RecommendationReport {
    pub fn titles(&self) -> Vec<String> {
        self.recommendations.iter().map(|r| r.title.clone()).collect()
    }
}

struct Candidate<'a> {
    title: &'a str,
    order: usize,
    content: Option<f64>,
    collaborative: Option<f64>,
}

/// Up to `top_n` titles most similar to `seed`, best first.
///
/// `seed` should already be a canonical title (see `catalog::resolve`).
/// The seed itself never appears in the output and no title appears twice.
/// Similarities are stored as `f32`, so near-ties can collapse into exact
/// ties broken by index, and the order among them may differ from a full
/// `f64` computation.
pub fn recommend(
    seed: &str,
    content: &SimilaritySpace,
    collaborative: &SimilaritySpace,
    top_n: usize,
    genre_weight: GenreWeight,
) -> Vec<String> {
    recommend_scored(seed, content, collaborative, top_n, genre_weight)
        .recommendations
        .into_iter()
        .map(|r| r.title)
        .collect()
}

/// Like [`recommend`], but keeps scores and reports missing spaces.
pub fn recommend_scored(
    seed: &str,
    content: &SimilaritySpace,
    collaborative: &SimilaritySpace,
    top_n: usize,
    genre_weight: GenreWeight,
) -> RecommendationReport {
    let mut warnings = Vec::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    match content.scores_for(seed) {
        Some(row) => {
            for (i, title, score) in row.filter(|&(_, t, _)| t != seed) {
                positions.insert(title, candidates.len());
                candidates.push(Candidate {
                    title,
                    order: i,
                    content: Some(score),
                    collaborative: None,
                });
            }
        }
        None => {
            warn!(seed, "Seed missing from content space");
            warnings.push(SpaceWarning::MissingFromContentSpace);
        }
    }

    match collaborative.scores_for(seed) {
        Some(row) => {
            for (i, title, score) in row.filter(|&(_, t, _)| t != seed) {
                match positions.get(title) {
                    Some(&pos) => candidates[pos].collaborative = Some(score),
                    None => candidates.push(Candidate {
                        title,
                        order: content.len() + i,
                        content: None,
                        collaborative: Some(score),
                    }),
                }
            }
        }
        None => {
            warn!(seed, "Seed missing from collaborative space, relying on content only");
            warnings.push(SpaceWarning::MissingFromCollaborativeSpace);
        }
    }

    let w = genre_weight.value();
    let mut scored: Vec<(f64, &Candidate)> = candidates
        .iter()
        .map(|c| {
            let combined =
                c.content.unwrap_or(0.0) * w + c.collaborative.unwrap_or(0.0) * (1.0 - w);
            (combined, c)
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.order.cmp(&b.1.order)));

    let mut seen: HashSet<&str> = HashSet::new();
    let recommendations: Vec<Recommendation> = scored
        .into_iter()
        .filter(|(_, c)| c.title != seed && seen.insert(c.title))
        .take(top_n)
        .map(|(score, c)| Recommendation {
            title: c.title.to_string(),
            score,
            content_score: c.content,
            collaborative_score: c.collaborative,
        })
        .collect();

    debug!(
        seed,
        candidates = candidates.len(),
        returned = recommendations.len(),
        genre_weight = w,
        "Scored hybrid recommendations"
    );

    RecommendationReport {
        seed: seed.to_string(),
        genre_weight,
        recommendations,
        warnings,
    }
}
