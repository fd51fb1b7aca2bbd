pub mod svd;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use num::Float;

/// 近接度
/// proximity(a, b) = Σ|a_i * b_i| / (||a|| * ||b||)
///
/// Cosine-shaped score that takes the absolute value of each elementwise
/// product, so opposite-signed LSI weights still count as agreement.
/// Returns 0 when either vector has zero norm.
///
/// # Arguments
/// * `a` - vector
/// * `b` - vector of the same length
#[inline]
pub fn proximity<F>(a: ArrayView1<'_, F>, b: ArrayView1<'_, F>) -> F
where
    F: Float,
{
    debug_assert_eq!(a.len(), b.len(), "Vectors must be of the same length to compute proximity.");
    let mut dot = F::zero();
    let mut norm_a = F::zero();
    let mut norm_b = F::zero();
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot = dot + (x * y).abs();
        norm_a = norm_a + x * x;
        norm_b = norm_b + y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == F::zero() {
        F::zero()
    } else {
        dot / denom
    }
}

/// Divide every element by the vector's absolute sum (no-op on a zero vector)
pub fn l1_normalize<F>(v: &mut Array1<F>)
where
    F: Float,
{
    let sum = v.iter().fold(F::zero(), |acc, &x| acc + x.abs());
    if sum > F::zero() {
        v.mapv_inplace(|x| x / sum);
    }
}

/// 列正規化
/// Returns a new matrix whose columns are divided by their absolute sums.
/// Columns summing to zero are copied as zeros.
pub fn normalize_columns(src: &Array2<f64>) -> Array2<f64> {
    let mut dst = Array2::zeros(src.raw_dim());
    for (j, col) in src.axis_iter(Axis(1)).enumerate() {
        let sum: f64 = col.iter().map(|x| x.abs()).sum();
        if sum == 0.0 {
            continue;
        }
        dst.column_mut(j).assign(&col.mapv(|x| x / sum));
    }
    dst
}

/// Mean of the given vectors, or `None` when there are none
pub fn mean<'a, I>(vectors: I, dim: usize) -> Option<Array1<f64>>
where
    I: IntoIterator<Item = ArrayView1<'a, f64>>,
{
    let mut acc = Array1::<f64>::zeros(dim);
    let mut n = 0usize;
    for v in vectors {
        acc += &v;
        n += 1;
    }
    if n == 0 {
        None
    } else {
        Some(acc / n as f64)
    }
}
