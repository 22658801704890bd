// Similarity matrices and the title <-> index tables that address them.
//
// A `SimilaritySpace` pairs one square matrix with one `TitleIndex` whose
// length equals the matrix dimension. Both checks happen at construction, so
// any index handed out by a space is a valid row.

use std::collections::HashMap;

use crate::error::ArtifactError;

/// Dense square similarity matrix, stored row-major.
///
/// Values are kept as f32: the content matrix covers the whole catalog, so
/// this halves the largest allocation in the process. Scores are widened to
/// f64 when read.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Wrap row-major values, which must hold exactly `dim * dim` entries.
    pub fn new(dim: usize, values: Vec<f32>) -> Result<Self, ArtifactError> {
        if dim.checked_mul(dim) != Some(values.len()) {
            return Err(ArtifactError::NotSquare {
                dim,
                values: values.len(),
            });
        }
        Ok(Self { dim, values })
    }

    /// Build from nested rows. Every row must have `rows.len()` entries.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ArtifactError> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(ArtifactError::NotSquare {
                    dim,
                    values: values.len() + row.len(),
                });
            }
            values.extend(row.iter().map(|&v| v as f32));
        }
        Self::new(dim, values)
    }

    /// All-zero matrix.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            values: vec![0.0; dim * dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.dim || col >= self.dim {
            return None;
        }
        Some(self.values[row * self.dim + col] as f64)
    }

    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.dim {
            return None;
        }
        let start = row * self.dim;
        Some(&self.values[start..start + self.dim])
    }

    /// Set a symmetric pair of cells. Used by the builders only.
    pub(crate) fn set_symmetric(&mut self, i: usize, j: usize, value: f32) {
        self.values[i * self.dim + j] = value;
        self.values[j * self.dim + i] = value;
    }
}

/// Bijective title <-> index table: an ordered title list plus its reverse map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleIndex {
    titles: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TitleIndex {
    /// Index titles by their position. Repeated titles break the bijection
    /// and are rejected.
    pub fn new(titles: Vec<String>) -> Result<Self, ArtifactError> {
        let mut positions = HashMap::with_capacity(titles.len());
        for (i, title) in titles.iter().enumerate() {
            if let Some(first) = positions.insert(title.clone(), i) {
                return Err(ArtifactError::DuplicateTitle {
                    title: title.clone(),
                    first,
                    second: i,
                });
            }
        }
        Ok(Self { titles, positions })
    }

    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.positions.get(title).copied()
    }

    pub fn title_at(&self, index: usize) -> Option<&str> {
        self.titles.get(index).map(String::as_str)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// One similarity space: a matrix and the index that names its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilaritySpace {
    matrix: SimilarityMatrix,
    index: TitleIndex,
}

impl SimilaritySpace {
    pub fn new(matrix: SimilarityMatrix, index: TitleIndex) -> Result<Self, ArtifactError> {
        if matrix.dim() != index.len() {
            return Err(ArtifactError::DimensionMismatch {
                titles: index.len(),
                dim: matrix.dim(),
            });
        }
        Ok(Self { matrix, index })
    }

    /// A space with no movies in it.
    pub fn empty() -> Self {
        Self {
            matrix: SimilarityMatrix::zeros(0),
            index: TitleIndex::default(),
        }
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn index(&self) -> &TitleIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.index.index_of(title).is_some()
    }

    /// Similarity of `title` to every movie in the space, in index order,
    /// or `None` if the title has no row here.
    pub fn scores_for<'a>(
        &'a self,
        title: &str,
    ) -> Option<impl Iterator<Item = (usize, &'a str, f64)> + 'a> {
        let row = self.matrix.row(self.index.index_of(title)?)?;
        Some(
            self.index
                .titles
                .iter()
                .zip(row.iter())
                .enumerate()
                .map(|(i, (t, &s))| (i, t.as_str(), s as f64)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matrix_rejects_non_square() {
        let err = SimilarityMatrix::new(2, vec![1.0, 0.5, 0.5]).unwrap_err();
        assert_eq!(err, ArtifactError::NotSquare { dim: 2, values: 3 });
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![1.0, 0.2], vec![0.2]];
        assert!(SimilarityMatrix::from_rows(&rows).is_err());
    }

    #[test]
    fn test_matrix_get_out_of_range() {
        let m = SimilarityMatrix::from_rows(&[vec![1.0, 0.3], vec![0.3, 1.0]]).unwrap();
        assert!((m.get(0, 1).unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(m.get(2, 0), None);
        assert!(m.row(2).is_none());
    }

    #[test]
    fn test_index_rejects_duplicates() {
        let err = TitleIndex::new(titles(&["A", "B", "A"])).unwrap_err();
        assert_eq!(
            err,
            ArtifactError::DuplicateTitle {
                title: "A".to_string(),
                first: 0,
                second: 2
            }
        );
    }

    #[test]
    fn test_index_round_trips_every_position() {
        let index = TitleIndex::new(titles(&["A", "B", "C"])).unwrap();
        for i in 0..index.len() {
            let title = index.title_at(i).unwrap();
            assert_eq!(index.index_of(title), Some(i));
        }
    }

    #[test]
    fn test_space_rejects_dimension_mismatch() {
        let matrix = SimilarityMatrix::zeros(3);
        let index = TitleIndex::new(titles(&["A", "B"])).unwrap();
        assert_eq!(
            SimilaritySpace::new(matrix, index).unwrap_err(),
            ArtifactError::DimensionMismatch { titles: 2, dim: 3 }
        );
    }

    #[test]
    fn test_scores_for_missing_title() {
        let space = SimilaritySpace::empty();
        assert!(space.scores_for("A").is_none());
    }

    #[test]
    fn test_scores_for_returns_row_in_index_order() {
        let matrix =
            SimilarityMatrix::from_rows(&[vec![1.0, 0.25], vec![0.25, 1.0]]).unwrap();
        let space = SimilaritySpace::new(matrix, TitleIndex::new(titles(&["A", "B"])).unwrap())
            .unwrap();
        let row: Vec<(usize, &str, f64)> = space.scores_for("B").unwrap().collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].1, "A");
        assert!((row[0].2 - 0.25).abs() < 1e-6);
        assert!((row[1].2 - 1.0).abs() < 1e-6);
    }
}
