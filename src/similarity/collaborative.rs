// Collaborative similarity — item-item cosine over user ratings.
//
// Ratings are joined to catalog titles by movie id and averaged per
// (user, title). Each rated title becomes a column of the user × title
// matrix, unrated cells being 0, and similarity between two titles is the
// cosine of their rating columns. Columns are the rated titles in sorted
// order, so the space covers only movies with at least one rating.
//
// Only co-rated pairs contribute to a dot product, so each row is
// accumulated by walking the title's raters and the other titles those
// raters scored, instead of comparing every dense column pair.

use std::collections::{BTreeMap, HashMap};

use tracing::{info, warn};

use super::matrix::{SimilarityMatrix, SimilaritySpace, TitleIndex};
use crate::catalog::loader::Rating;
use crate::catalog::Catalog;
use crate::error::ArtifactError;

/// Build the collaborative space from raw ratings.
///
/// Ratings whose movie id isn't in the catalog are dropped.
pub fn build_collaborative_space(
    catalog: &Catalog,
    ratings: &[Rating],
) -> Result<SimilaritySpace, ArtifactError> {
    // title -> user -> (sum, count); ordered maps keep the build deterministic
    let mut cells: BTreeMap<&str, BTreeMap<u32, (f64, u32)>> = BTreeMap::new();
    let mut unknown = 0usize;

    for rating in ratings {
        let Some(movie) = catalog.by_movie_id(rating.movie_id) else {
            unknown += 1;
            continue;
        };
        let cell = cells
            .entry(movie.title.as_str())
            .or_default()
            .entry(rating.user_id)
            .or_insert((0.0, 0));
        cell.0 += rating.rating;
        cell.1 += 1;
    }

    if unknown > 0 {
        warn!(unknown, "Ignored ratings for movies missing from the catalog");
    }

    let titles: Vec<String> = cells.keys().map(|t| t.to_string()).collect();
    let k = titles.len();

    // Dense user slots so both adjacency lists are plain vectors
    let mut user_slots: HashMap<u32, usize> = HashMap::new();
    let mut item_raters: Vec<Vec<(usize, f64)>> = Vec::with_capacity(k);
    let mut user_items: Vec<Vec<(usize, f64)>> = Vec::new();

    for (item, users) in cells.values().enumerate() {
        let raters: Vec<(usize, f64)> = users
            .iter()
            .map(|(&user_id, &(sum, count))| {
                let next = user_slots.len();
                let slot = *user_slots.entry(user_id).or_insert(next);
                if slot == user_items.len() {
                    user_items.push(Vec::new());
                }
                let mean = sum / count as f64;
                user_items[slot].push((item, mean));
                (slot, mean)
            })
            .collect();
        item_raters.push(raters);
    }

    let norms: Vec<f64> = item_raters
        .iter()
        .map(|raters| raters.iter().map(|(_, r)| r * r).sum::<f64>().sqrt())
        .collect();

    let mut matrix = SimilarityMatrix::zeros(k);
    let mut dots = vec![0.0f64; k];

    for a in 0..k {
        if norms[a] < f64::EPSILON {
            continue;
        }
        matrix.set_symmetric(a, a, 1.0);

        dots.iter_mut().for_each(|d| *d = 0.0);
        for &(user, ra) in &item_raters[a] {
            for &(b, rb) in &user_items[user] {
                if b > a {
                    dots[b] += ra * rb;
                }
            }
        }

        for b in (a + 1)..k {
            if dots[b] == 0.0 || norms[b] < f64::EPSILON {
                continue;
            }
            let sim = (dots[b] / (norms[a] * norms[b])).clamp(-1.0, 1.0);
            matrix.set_symmetric(a, b, sim as f32);
        }
    }

    info!(
        rated_movies = k,
        users = user_items.len(),
        ratings = ratings.len() - unknown,
        "Built collaborative similarity space"
    );

    SimilaritySpace::new(matrix, TitleIndex::new(titles)?)
}
