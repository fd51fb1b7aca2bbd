use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    corpus::document::Document,
    utils::similarity::{lc_suffix_similarity, shared_labels, shared_suffix},
};

use super::union_find::UnionFindConfig;

/// Candidate link between two documents (positions in the input slice)
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    /// `lc_suffix_similarity` of the transformed names, in [0, 1]
    pub weight: f64,
    /// shared name tokens, plus the shared suffix token when there is one
    pub labels: IndexSet<String>,
    /// head word both names end with
    pub suffix: Option<String>,
}

impl Edge {
    #[inline]
    pub fn shares_suffix(&self) -> bool {
        self.suffix.is_some()
    }
}

/// 類似度グラフ
/// Name-similarity graph over a document list, edges sorted by descending
/// weight (ties keep pair order: (0,1), (0,2), ..., (1,2), ...).
#[derive(Debug, Clone)]
pub struct Graph {
    size: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Score every unordered pair and keep the edges that pass the filters
    ///
    /// A pair is dropped when both documents have the same qualified name,
    /// or when the names share no suffix and either share no labels at all or
    /// have `weight <= edge_score` with fewer than two labels.
    pub fn build(documents: &[Document], config: &UnionFindConfig) -> Self {
        let n = documents.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();

        let mut edges: Vec<Edge> = pairs
            .par_iter()
            .filter_map(|&(i, j)| Self::edge(documents, i, j, config))
            .collect();
        edges.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        debug!(documents = n, pairs = pairs.len(), edges = edges.len(), "built similarity graph");
        Self { size: n, edges }
    }

    fn edge(documents: &[Document], i: usize, j: usize, config: &UnionFindConfig) -> Option<Edge> {
        let (a, b) = (&documents[i], &documents[j]);
        if a.qualified_name() == b.qualified_name() {
            return None;
        }
        let (name_a, name_b) = (a.transformed_name(), b.transformed_name());
        let weight = lc_suffix_similarity(name_a, name_b);
        let mut labels = shared_labels(name_a, name_b, config.min_label_len);
        let suffix = shared_suffix(name_a, name_b);

        if suffix.is_none()
            && ((weight <= config.edge_score && labels.len() < 2) || labels.is_empty())
        {
            return None;
        }
        if let Some(s) = &suffix {
            labels.insert(s.clone());
        }
        Some(Edge { from: i, to: j, weight, labels, suffix })
    }

    /// Whether two documents' transformed names end with the same head word
    pub fn shared_suffix(a: &Document, b: &Document) -> bool {
        shared_suffix(a.transformed_name(), b.transformed_name()).is_some()
    }

    /// Number of documents (vertices)
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges eligible for the forest: `weight >= min_score` and a shared suffix,
    /// still in descending weight order
    pub fn forest_edges(&self, min_score: f64) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(move |e| e.weight >= min_score && e.shares_suffix())
    }
}
