use std::cmp::Ordering;

/// Stable sort by descending score.
/// - Drops NaN scores first
/// - Equal scores keep their input order, which keeps rankings reproducible
#[inline]
pub fn sort_by_score_desc<T>(list: &mut Vec<(T, f64)>) {
    list.retain(|(_, s)| !s.is_nan());
    list.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Index of the largest score, first one on ties.
/// NaN never wins; `None` for an empty or all-NaN slice.
#[inline]
pub fn argmax_first(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if s.partial_cmp(&b) != Some(Ordering::Greater) => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}
