use docsearch_common::{DocSearchError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::cmp::Ordering;

use crate::types::Hit;

/// Exhaustive inner-product index over row vectors of a fixed dimension
///
/// Rows are stored contiguously in insertion order, so the row number is the
/// position shared with the document store. Vectors are expected to be
/// normalized by the caller; the index itself only computes dot products.
#[derive(Debug, Clone)]
pub struct FlatIpIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    /// Create new empty index
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reject a matrix whose row width differs from the index dimension
    pub fn check(&self, vectors: &Array2<f32>) -> Result<()> {
        if vectors.ncols() != self.dim {
            return Err(DocSearchError::dimension_mismatch(self.dim, vectors.ncols()));
        }
        Ok(())
    }

    /// Append all rows in order
    pub fn add(&mut self, vectors: &Array2<f32>) -> Result<()> {
        self.check(vectors)?;
        self.data.reserve(vectors.len());
        for row in vectors.rows() {
            self.data.extend(row.iter().copied());
        }
        Ok(())
    }

    /// Top `k` rows by descending inner product with `query`
    ///
    /// Equal scores keep ascending position order. When fewer than `k` vectors
    /// are stored the result is padded with [`Hit::sentinel`] entries. An empty
    /// index or `k == 0` yields an empty result.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Hit>> {
        if query.len() != self.dim {
            return Err(DocSearchError::dimension_mismatch(self.dim, query.len()));
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.matrix()?.dot(&ArrayView1::from(query));
        let mut ranked: Vec<Hit> = scores
            .iter()
            .enumerate()
            .map(|(position, &score)| Hit::new(position, score))
            .collect();

        if k < ranked.len() {
            ranked.select_nth_unstable_by(k - 1, rank_order);
            ranked.truncate(k);
        }
        ranked.sort_by(rank_order);

        ranked.resize(k, Hit::sentinel());
        Ok(ranked)
    }

    /// Remove all vectors; the dimension is kept
    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn matrix(&self) -> Result<ArrayView2<'_, f32>> {
        ArrayView2::from_shape((self.len(), self.dim), &self.data)
            .map_err(|e| DocSearchError::internal(format!("Corrupt index storage: {}", e)))
    }
}

/// Descending score, then ascending position
fn rank_order(a: &Hit, b: &Hit) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.position.cmp(&b.position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn index_with(rows: Array2<f32>) -> FlatIpIndex {
        let mut index = FlatIpIndex::new(rows.ncols());
        index.add(&rows).unwrap();
        index
    }

    #[test]
    fn test_search_orders_by_score() {
        let index = index_with(array![[1.0, 0.0], [0.0, 1.0], [0.6, 0.8]]);
        let hits = index.search(&[1.0, 0.0], 3).unwrap();

        let positions: Vec<_> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![Some(0), Some(2), Some(1)]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!((hits[1].score - 0.6).abs() < 1e-6);
        assert!(hits[2].score.abs() < 1e-6);
    }

    #[test]
    fn test_search_truncates_to_k() {
        let index = index_with(array![[0.1, 0.0], [0.9, 0.0], [0.5, 0.0], [0.7, 0.0]]);
        let hits = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].position, Some(1));
        assert_eq!(hits[1].position, Some(3));
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let index = index_with(array![[0.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]]);
        let hits = index.search(&[0.0, 1.0], 2).unwrap();
        let positions: Vec<_> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![Some(0), Some(2)]);

        let hits = index.search(&[0.0, 1.0], 4).unwrap();
        let positions: Vec<_> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![Some(0), Some(2), Some(3), Some(1)]);
    }

    #[test]
    fn test_pads_with_sentinels() {
        let index = index_with(array![[1.0, 0.0], [0.0, 1.0]]);
        let hits = index.search(&[1.0, 0.0], 5).unwrap();
        assert_eq!(hits.len(), 5);
        assert_eq!(hits.iter().filter(|h| h.is_sentinel()).count(), 3);
        assert!(hits[..2].iter().all(|h| !h.is_sentinel()));
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = FlatIpIndex::new(3);
        assert!(index.search(&[1.0, 0.0, 0.0], 10).unwrap().is_empty());

        let index = index_with(array![[1.0, 0.0]]);
        assert!(index.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut index = FlatIpIndex::new(3);
        let err = index.add(&array![[1.0, 0.0]]).unwrap_err();
        assert!(matches!(
            err,
            DocSearchError::DimensionMismatch { expected: 3, actual: 2 }
        ));
        assert!(index.is_empty());

        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_clear_restarts_positions() {
        let mut index = index_with(array![[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(index.len(), 2);

        index.clear();
        assert_eq!(index.len(), 0);
        assert_eq!(index.dimension(), 2);

        index.add(&array![[0.0, 1.0]]).unwrap();
        let hits = index.search(&[0.0, 1.0], 1).unwrap();
        assert_eq!(hits[0].position, Some(0));
    }
}
