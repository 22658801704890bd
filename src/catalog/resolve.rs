// Title resolution — turning whatever the user typed into one catalog title.
//
// Matching is a case-insensitive substring test of the cleaned query against
// each movie's cleaned title. An exact match on the raw query wins; otherwise
// the first match in catalog order does. That order is an arbitrary but
// stable tie-break.

use super::{clean_title, Catalog, Movie};
use crate::error::ResolveError;

/// Every catalog movie whose cleaned title contains the cleaned query,
/// ignoring ASCII case, in catalog order.
///
/// A query that cleans down to nothing matches every movie.
pub fn matching_movies<'a>(query: &str, catalog: &'a Catalog) -> Vec<&'a Movie> {
    let needle = clean_title(query).to_ascii_lowercase();
    catalog
        .movies()
        .iter()
        .filter(|m| m.clean_title.to_ascii_lowercase().contains(&needle))
        .collect()
}

/// Resolve a free-text query to a canonical catalog title.
pub fn resolve_title(query: &str, catalog: &Catalog) -> Result<String, ResolveError> {
    let matches = matching_movies(query, catalog);

    let Some(first) = matches.first() else {
        return Err(ResolveError::NotFound {
            query: query.to_string(),
        });
    };

    // The raw query can differ from its cleaned form, so an exact title hit
    // is checked against the whole catalog rather than just the matches.
    if let Some(exact) = catalog.get(query) {
        return Ok(exact.title.clone());
    }

    Ok(first.title.clone())
}
