//! String and token similarity scores used as graph edge weights.

use std::hash::Hash;

use indexmap::IndexSet;

/// 名前をトークンに分割する
/// Splits an identifier into lowercase word tokens.
///
/// Boundaries are `_ - . $ /` and whitespace, lower→upper case changes
/// (`boxShape`), the end of an acronym (`HTTPServer` -> `http`, `server`)
/// and letter/digit changes.
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut tokens);
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()))
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic());
            if boundary {
                flush(&mut current, &mut tokens);
            }
        }
        current.extend(c.to_lowercase());
    }
    flush(&mut current, &mut tokens);
    tokens
}

#[inline]
fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Jaccard index |A ∩ B| / |A ∪ B|; 0 for two empty sets
pub fn jaccard<T>(a: &IndexSet<T>, b: &IndexSet<T>) -> f64
where
    T: Eq + Hash,
{
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

/// Length of the longest common subsequence (by chars)
pub fn lcs_len(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// LCS length over the longer string's length, case-insensitive; in [0, 1]
pub fn lcs_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    lcs_len(&a, &b) as f64 / longest as f64
}

/// 最長共通接尾辞
/// The longest suffix of either string that occurs somewhere in the other.
///
/// `("BoxShape", "Box")` -> `"box"`: `box` ends the second name and appears
/// in the first. Comparison is case-insensitive; the result is lowercase.
pub fn lc_suffix(a: &str, b: &str) -> String {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let from_a = longest_suffix_within(&a, &b);
    let from_b = longest_suffix_within(&b, &a);
    if from_b.chars().count() > from_a.chars().count() {
        from_b.to_string()
    } else {
        from_a.to_string()
    }
}

/// longest suffix of `s` contained in `other`
fn longest_suffix_within<'a>(s: &'a str, other: &str) -> &'a str {
    // char_indices ascend, so the first hit is the longest suffix
    for (pos, _) in s.char_indices() {
        let suffix = &s[pos..];
        if other.contains(suffix) {
            return suffix;
        }
    }
    ""
}

/// |lc_suffix(a, b)| / max(|a|, |b|), in [0, 1]
pub fn lc_suffix_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    lc_suffix(a, b).chars().count() as f64 / longest as f64
}

/// Tokens of at least `min_len` chars that both names contain
pub fn shared_labels(a: &str, b: &str, min_len: usize) -> IndexSet<String> {
    let right: IndexSet<String> = split_words(b).into_iter().collect();
    split_words(a)
        .into_iter()
        .filter(|t| t.chars().count() >= min_len && right.contains(t))
        .collect()
}

/// 共通の末尾語
/// The token two names share as their head word.
///
/// Either both names end with the same token, or one name is a single
/// token that the other contains (`Box` / `BoxShape`).
pub fn shared_suffix(a: &str, b: &str) -> Option<String> {
    let left = split_words(a);
    let right = split_words(b);
    let (last_l, last_r) = (left.last()?, right.last()?);
    if last_l == last_r {
        return Some(last_l.clone());
    }
    if left.len() == 1 && right.contains(last_l) {
        return Some(last_l.clone());
    }
    if right.len() == 1 && left.contains(last_r) {
        return Some(last_r.clone());
    }
    None
}
