use indexmap::IndexSet;
use tracing::debug;

use crate::{
    corpus::document::Document,
    error::{Error, Result},
    utils::{
        similarity::split_words,
        typicality::{typical_word, typicality},
    },
};

use super::{Group, Groups};

/// Settings of `prune_doc_groups`.
#[derive(Debug, Clone)]
pub struct PruneConfig {
    /// Scales the typicality radius.
    pub weight: f64,
    /// Kernel width of the typicality estimate.
    pub bandwidth: f64,
    /// Tokens ignored when splitting short names.
    pub stop_words: IndexSet<String>,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            weight: 1.0,
            bandwidth: 0.5,
            stop_words: IndexSet::new(),
        }
    }
}

impl PruneConfig {
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = words.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.bandwidth.is_nan() || self.bandwidth <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "bandwidth",
                message: "must be positive",
            });
        }
        if self.weight.is_nan() || self.weight < 0.0 {
            return Err(Error::InvalidParameter {
                name: "weight",
                message: "must not be negative",
            });
        }
        Ok(())
    }
}

/// 典型性による枝刈り
/// Drops documents whose name tokens are all atypical for their group.
///
/// Per group: split every short name into tokens, score each distinct token
/// by typicality, take the most typical token's score `t` and the radius
/// `weight * sqrt(mean((s_i - mean)^2))` over all token scores. A document
/// stays when any of its tokens has `|t - s| < radius`. A radius of 0 (all
/// tokens equally typical) keeps the whole group.
///
/// Group count never grows and membership never grows; groups emptied by
/// pruning are dropped. The index attached to `groups` is carried over.
pub fn prune_doc_groups(
    groups: Groups<Document>,
    config: &PruneConfig,
) -> Result<Groups<Document>> {
    config.validate()?;
    let (list, index) = groups.into_parts();
    let before: usize = list.iter().map(Group::len).sum();
    let pruned: Vec<Group<Document>> = list.into_iter().map(|g| prune_group(g, config)).collect();
    let after: usize = pruned.iter().map(Group::len).sum();
    debug!(before, after, "pruned document groups");
    Ok(Groups::new(pruned, index))
}

fn prune_group(group: Group<Document>, config: &PruneConfig) -> Group<Document> {
    let tokens: Vec<Vec<String>> = group
        .iter()
        .map(|doc| {
            split_words(doc.short_name())
                .into_iter()
                .filter(|t| !config.stop_words.contains(t))
                .collect()
        })
        .collect();
    let population: Vec<&str> = tokens.iter().flatten().map(String::as_str).collect();
    let scores = typicality(&population, config.bandwidth);
    let Some((_, typical)) = typical_word(&scores) else {
        return group;
    };

    let k = scores.len() as f64;
    let mean = scores.values().sum::<f64>() / k;
    let variance = scores.values().map(|s| (s - mean).powi(2)).sum::<f64>() / k;
    let radius = variance.sqrt() * config.weight;
    if radius == 0.0 {
        return group;
    }

    group
        .into_items()
        .into_iter()
        .zip(tokens)
        .filter(|(_, doc_tokens)| {
            doc_tokens
                .iter()
                .any(|t| scores.get(t).is_some_and(|s| (typical - s).abs() < radius))
        })
        .map(|(doc, _)| doc)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(names: &[&str]) -> Group<Document> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Document::from_container(i, &format!("pkg{i}.{n}")))
            .collect()
    }

    fn short_names(groups: &Groups<Document>) -> Vec<Vec<&str>> {
        groups
            .iter()
            .map(|g| g.iter().map(Document::short_name).collect())
            .collect()
    }

    #[test]
    fn atypical_documents_are_dropped() {
        let groups = Groups::new(
            vec![group(&[
                "CircleShape",
                "BoxShape",
                "ShapeFactory",
                "Shape",
                "ZebraCrossingLight",
            ])],
            None,
        );
        let pruned = prune_doc_groups(groups, &PruneConfig::default()).unwrap();
        assert_eq!(
            short_names(&pruned),
            vec![vec!["CircleShape", "BoxShape", "ShapeFactory", "Shape"]]
        );
    }

    #[test]
    fn uniform_groups_are_kept() {
        let groups = Groups::new(vec![group(&["Alpha", "Alpha"])], None);
        let pruned = prune_doc_groups(groups, &PruneConfig::default()).unwrap();
        assert_eq!(pruned.item_count(), 2);
    }

    #[test]
    fn pruning_never_adds_members() {
        let groups = Groups::new(
            vec![
                group(&["QuickSort", "MergeSort", "Sorter", "HttpClient"]),
                group(&["Canvas", "CanvasPainter", "Brush"]),
            ],
            None,
        );
        let originals = groups.clone();
        let pruned = prune_doc_groups(groups, &PruneConfig::default()).unwrap();
        assert!(pruned.len() <= originals.len());
        for g in pruned.iter() {
            let source = originals
                .iter()
                .find(|o| g.iter().all(|d| o.contains(d)))
                .expect("pruned group comes from an original group");
            assert!(g.len() <= source.len());
        }
    }

    #[test]
    fn stop_words_are_ignored() {
        let config = PruneConfig::default().with_stop_words(["Shape"]);
        assert!(config.stop_words.contains("shape"));
        // without `shape` every remaining token occurs once, so nothing is dropped
        let groups = Groups::new(vec![group(&["CircleShape", "BoxShape"])], None);
        let pruned = prune_doc_groups(groups, &config).unwrap();
        assert_eq!(pruned.item_count(), 2);
    }

    #[test]
    fn invalid_bandwidth_and_weight() {
        for config in [
            PruneConfig::default().with_bandwidth(0.0),
            PruneConfig::default().with_bandwidth(f64::NAN),
            PruneConfig::default().with_weight(-1.0),
            PruneConfig::default().with_weight(f64::NAN),
        ] {
            let groups = Groups::new(vec![group(&["A"])], None);
            assert!(matches!(
                prune_doc_groups(groups, &config),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }
}
