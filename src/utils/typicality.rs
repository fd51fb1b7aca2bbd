//! Typicality of tokens within a token population.
//!
//! A token is typical when many tokens of the population sit close to it.
//! Score is a Gaussian kernel density estimate:
//!
//! ```text
//! T(t) = (1/N) Σ_u exp(-d(t, u)² / (2h²)),   d = 1 - lcs_similarity
//! ```
//!
//! summed over the whole population `u` (repeated tokens count every time),
//! so a more frequent token never scores below an otherwise identical rarer one.

use indexmap::IndexMap;

use super::similarity::lcs_similarity;

/// Score every distinct token of `population`
///
/// # Arguments
/// * `population` - tokens, repeated as often as they occur
/// * `bandwidth` - kernel width `h`, must be positive
///
/// # Returns
/// * distinct token -> typicality, in first-seen order
pub fn typicality<T>(population: &[T], bandwidth: f64) -> IndexMap<String, f64>
where
    T: AsRef<str>,
{
    let mut frequency: IndexMap<&str, usize> = IndexMap::new();
    for token in population {
        *frequency.entry(token.as_ref()).or_insert(0) += 1;
    }
    let n = population.len() as f64;
    let two_h_sq = 2.0 * bandwidth * bandwidth;

    frequency
        .keys()
        .map(|&token| {
            let density: f64 = frequency
                .iter()
                .map(|(&other, &count)| {
                    let d = 1.0 - lcs_similarity(token, other);
                    count as f64 * (-(d * d) / two_h_sq).exp()
                })
                .sum();
            (token.to_string(), density / n)
        })
        .collect()
}

/// The token with the highest score, first one on ties
pub fn typical_word(scores: &IndexMap<String, f64>) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (token, &score) in scores {
        match best {
            Some((_, s)) if score <= s => {}
            _ => best = Some((token.as_str(), score)),
        }
    }
    best
}
