//! Thin singular value decomposition by one-sided Jacobi rotations.
//!
//! For `A` (m×n) returns `U` (m×r), `S` (r) and `V` (n×r) with
//! `r = min(m, n)`, `A = U · diag(S) · Vᵀ`, singular values sorted in
//! descending order. Columns of `U` that belong to a zero singular value are
//! left as zero vectors.

use ndarray::{s, Array1, Array2, Axis};

const MAX_SWEEPS: usize = 60;
const TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct Svd {
    pub u: Array2<f64>,
    pub s: Array1<f64>,
    pub v: Array2<f64>,
}

impl Svd {
    /// Decompose `a`
    pub fn new(a: &Array2<f64>) -> Self {
        let (m, n) = a.dim();
        if m >= n {
            let (u, s, v) = one_sided_jacobi(a);
            Svd { u, s, v }
        } else {
            // Aᵀ = U' S V'ᵀ  =>  A = V' S U'ᵀ
            let (u, s, v) = one_sided_jacobi(&a.t().to_owned());
            Svd { u: v, s, v: u }
        }
    }

    /// Rank of the decomposition (number of singular values kept)
    pub fn rank(&self) -> usize {
        self.s.len()
    }

    /// U_k · S_k · V_kᵀ
    pub fn reconstruct(&self, k: usize) -> Array2<f64> {
        let k = k.min(self.rank());
        let u_k = self.u.slice(s![.., ..k]);
        let s_k = self.s.slice(s![..k]);
        let v_k = self.v.slice(s![.., ..k]);
        let us = &u_k * &s_k.insert_axis(Axis(0));
        us.dot(&v_k.t())
    }
}

/// Requires `m >= n`.
fn one_sided_jacobi(a: &Array2<f64>) -> (Array2<f64>, Array1<f64>, Array2<f64>) {
    let (m, n) = a.dim();
    let mut u = a.clone();
    let mut v = Array2::<f64>::eye(n);

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0_f64;
        for p in 0..n {
            for q in (p + 1)..n {
                let alpha = u.column(p).dot(&u.column(p));
                let beta = u.column(q).dot(&u.column(q));
                let gamma = u.column(p).dot(&u.column(q));
                if gamma == 0.0 {
                    continue;
                }
                let scale = (alpha * beta).sqrt();
                if scale == 0.0 {
                    continue;
                }
                off = off.max(gamma.abs() / scale);
                if gamma.abs() <= TOLERANCE * scale {
                    continue;
                }

                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let sn = c * t;

                rotate(&mut u, p, q, c, sn, m);
                rotate(&mut v, p, q, c, sn, n);
            }
        }
        if off <= TOLERANCE {
            break;
        }
    }

    let mut sigma = Array1::<f64>::zeros(n);
    for j in 0..n {
        let norm = u.column(j).dot(&u.column(j)).sqrt();
        sigma[j] = norm;
        if norm > 0.0 {
            u.column_mut(j).mapv_inplace(|x| x / norm);
        }
    }

    // descending singular values, stable on ties
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| sigma[j].total_cmp(&sigma[i]));

    let u_sorted = u.select(Axis(1), &order);
    let v_sorted = v.select(Axis(1), &order);
    let s_sorted = sigma.select(Axis(0), &order);
    (u_sorted, s_sorted, v_sorted)
}

#[inline]
fn rotate(x: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64, rows: usize) {
    for i in 0..rows {
        let xp = x[[i, p]];
        let xq = x[[i, q]];
        x[[i, p]] = c * xp - s * xq;
        x[[i, q]] = s * xp + c * xq;
    }
}
