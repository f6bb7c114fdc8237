//! L2 normalization so that inner product equals cosine similarity.

use docsearch_common::{DocSearchError, Result};
use ndarray::{Array2, ArrayView1, ArrayViewMut1};

/// Rescale every row of an `(n, dim)` matrix to unit L2 norm in place
///
/// Rows with a zero (or non-finite) norm are left untouched.
pub fn normalize_rows(vectors: &mut Array2<f32>) {
    for row in vectors.rows_mut() {
        normalize_view(row);
    }
}

/// Rescale a single vector to unit L2 norm in place
pub fn normalize_vector(vector: &mut [f32]) {
    normalize_view(ArrayViewMut1::from(vector));
}

fn normalize_view(mut row: ArrayViewMut1<'_, f32>) {
    let norm = l2_norm(row.view());
    if norm > 0.0 && norm.is_finite() {
        row.mapv_inplace(|x| x / norm);
    }
}

/// L2 norm scaled by the largest component so the sum of squares cannot overflow
fn l2_norm(row: ArrayView1<'_, f32>) -> f32 {
    let scale = row.fold(0.0f32, |m, &x| m.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum = row.fold(0.0f32, |acc, &x| {
        let y = x / scale;
        acc + y * y
    });
    scale * sum.sqrt()
}

/// Stack embeddings into an `(n, dim)` matrix, checking every row's length
/// and rejecting NaN or infinite components.
pub fn stack_embeddings(vectors: Vec<Vec<f32>>, dim: usize) -> Result<Array2<f32>> {
    let rows = vectors.len();
    let mut flat = Vec::with_capacity(rows * dim);

    for vector in vectors {
        if vector.len() != dim {
            return Err(DocSearchError::dimension_mismatch(dim, vector.len()));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(DocSearchError::invalid_input(
                "embedding contains non-finite values",
            ));
        }
        flat.extend(vector);
    }

    Array2::from_shape_vec((rows, dim), flat)
        .map_err(|e| DocSearchError::internal(format!("Failed to build embedding matrix: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn test_rows_have_unit_norm() {
        let mut m = array![[3.0f32, 4.0], [1.0, 1.0], [0.0, -2.0]];
        normalize_rows(&mut m);
        for row in m.rows() {
            assert!((row.dot(&row).sqrt() - 1.0).abs() < 1e-6);
        }
        assert!((m[[0, 0]] - 0.6).abs() < 1e-6);
        assert!((m[[0, 1]] - 0.8).abs() < 1e-6);
        assert!((m[[2, 1]] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_left_unchanged() {
        let mut m = array![[0.0f32, 0.0, 0.0], [2.0, 0.0, 0.0]];
        normalize_rows(&mut m);
        assert_eq!(m.row(0).to_vec(), vec![0.0, 0.0, 0.0]);
        assert!(m.iter().all(|x| !x.is_nan()));
        assert_eq!(m.row(1).to_vec(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_large_finite_vector_is_normalized() {
        let mut v = vec![1e20f32, 0.0];
        normalize_vector(&mut v);
        assert_eq!(v, vec![1.0, 0.0]);

        let mut m = array![[3e30f32, -4e30], [1e-30, 1e-30]];
        normalize_rows(&mut m);
        assert!((m[[0, 0]] - 0.6).abs() < 1e-6);
        assert!((m[[0, 1]] + 0.8).abs() < 1e-6);
        for row in m.rows() {
            assert!((row.dot(&row).sqrt() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut v = vec![0.2f32, -0.5, 0.7, 1.3];
        normalize_vector(&mut v);
        let once = v.clone();
        normalize_vector(&mut v);
        for (a, b) in once.iter().zip(v.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        assert!((norm(&v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stack_embeddings_checks_dimension() {
        let m = stack_embeddings(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 2).unwrap();
        assert_eq!(m.dim(), (2, 2));

        let err = stack_embeddings(vec![vec![1.0, 2.0], vec![3.0]], 2).unwrap_err();
        assert!(matches!(
            err,
            DocSearchError::DimensionMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_stack_embeddings_rejects_nan() {
        let err = stack_embeddings(vec![vec![f32::NAN, 1.0]], 2).unwrap_err();
        assert!(matches!(err, DocSearchError::InvalidInput(_)));
    }
}
