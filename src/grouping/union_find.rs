//! Graph clustering of documents by name similarity.
//!
//! Three phases:
//! 1. build the similarity `Graph`
//! 2. union the endpoints of every forest edge (`weight >= min_score` with a
//!    shared suffix), strongest first
//! 3. reattach orphans (singleton sets) to the best matching multi-document
//!    set, repeated `orphan_passes` times; a set that took an orphan is
//!    represented by that orphan in the next pass

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    corpus::document::Document,
    error::{Error, Result},
    utils::{
        datastruct::union_find::UnionFind,
        similarity::{lc_suffix_similarity, shared_labels, shared_suffix},
    },
};

use super::{graph::Graph, Group, Groups, Magnet};

/// Thresholds of the graph clustering.
#[derive(Debug, Clone)]
pub struct UnionFindConfig {
    /// Lowest edge weight allowed into the forest.
    pub min_score: f64,
    /// Weight an edge without a shared suffix must beat when it has fewer
    /// than two shared labels; also the orphan distance threshold.
    pub edge_score: f64,
    /// Shortest token that counts as a shared label.
    pub min_label_len: usize,
    /// Number of orphan reattachment passes.
    pub orphan_passes: usize,
}

impl Default for UnionFindConfig {
    fn default() -> Self {
        Self {
            min_score: 0.2,
            edge_score: 0.6,
            min_label_len: 3,
            orphan_passes: 2,
        }
    }
}

impl UnionFindConfig {
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_edge_score(mut self, edge_score: f64) -> Self {
        self.edge_score = edge_score;
        self
    }

    pub fn with_min_label_len(mut self, min_label_len: usize) -> Self {
        self.min_label_len = min_label_len;
        self
    }

    pub fn with_orphan_passes(mut self, orphan_passes: usize) -> Self {
        self.orphan_passes = orphan_passes;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(Error::InvalidParameter {
                name: "min_score",
                message: "must be within [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.edge_score) {
            return Err(Error::InvalidParameter {
                name: "edge_score",
                message: "must be within [0, 1]",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnionFindMagnet {
    config: UnionFindConfig,
}

impl UnionFindMagnet {
    pub fn new(config: UnionFindConfig) -> Self {
        Self { config }
    }
}

impl Magnet<Document> for UnionFindMagnet {
    type Output = Groups<Document>;

    fn apply(&self, documents: &[Document]) -> Result<Groups<Document>> {
        if documents.is_empty() {
            return Err(Error::EmptyInput { what: "documents" });
        }
        self.config.validate()?;

        let graph = Graph::build(documents, &self.config);
        let mut sets = UnionFind::new(documents.len());
        let mut unions = 0;
        for edge in graph.forest_edges(self.config.min_score) {
            if !sets.connected(edge.from, edge.to) {
                sets.union(edge.from, edge.to);
                unions += 1;
            }
        }
        debug!(unions, "forest built");

        let mut representatives = IndexMap::new();
        for pass in 0..self.config.orphan_passes {
            let merged =
                reattach_orphans(documents, &mut sets, &mut representatives, &self.config);
            debug!(pass, merged, "orphan pass");
        }

        let groups = sets
            .classes()
            .into_iter()
            .map(|class| class.into_iter().map(|i| documents[i].clone()).collect())
            .collect::<Vec<Group<Document>>>();
        Ok(Groups::new(groups, None))
    }
}

/// One orphan pass; returns the number of orphans merged
///
/// Candidate parents are the representatives of the multi-document sets at
/// the start of the pass: the root of the set, or the orphan that most
/// recently joined it (tracked in `representatives`, keyed by root). A
/// parent is skipped when it is the orphan itself, or when the two names
/// share no suffix and `distance < edge_score`. The first remaining parent
/// with shared labels or a shared suffix becomes the match; a later parent
/// replaces it only with shared labels and a strictly larger distance to the
/// orphan.
fn reattach_orphans(
    documents: &[Document],
    sets: &mut UnionFind,
    representatives: &mut IndexMap<usize, usize>,
    config: &UnionFindConfig,
) -> usize {
    let classes = sets.classes();
    let parents: Vec<usize> = classes
        .iter()
        .filter(|c| c.len() > 1)
        .map(|c| {
            let root = sets.find(c[0]);
            representatives.get(&root).copied().unwrap_or(root)
        })
        .collect();
    let orphans: Vec<usize> = classes
        .iter()
        .filter(|c| c.len() == 1)
        .map(|c| c[0])
        .collect();

    let mut merged = 0;
    for orphan in orphans {
        let name = documents[orphan].transformed_name();
        let mut best: Option<usize> = None;

        for &parent in &parents {
            if documents[orphan] == documents[parent] {
                continue;
            }
            let parent_name = documents[parent].transformed_name();
            let suffix = shared_suffix(name, parent_name).is_some();
            let distance = lc_suffix_similarity(name, parent_name);
            if distance < config.edge_score && !suffix {
                continue;
            }
            let labels = shared_labels(name, parent_name, config.min_label_len);
            best = match best {
                None if !labels.is_empty() || suffix => Some(parent),
                Some(current)
                    if !labels.is_empty()
                        && distance
                            > lc_suffix_similarity(name, documents[current].transformed_name()) =>
                {
                    Some(parent)
                }
                other => other,
            };
        }

        if let Some(parent) = best {
            trace!(orphan = %documents[orphan], parent = %documents[parent], "orphan reattached");
            let root = sets.union(orphan, parent);
            representatives.insert(root, orphan);
            merged += 1;
        }
    }
    merged
}
