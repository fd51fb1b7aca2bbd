//! Centroid clustering over LSI vectors.
//!
//! 1. Seed ⌊√n⌋ clusters with the first ⌊√n⌋ items, one each
//! 2. Recompute every centroid as the mean of its members
//! 3. Move every item to the cluster whose centroid has the highest
//!    `proximity` (first cluster wins ties)
//! 4. Stop once cluster memberships are the same as after the previous round
//!
//! Seeds come from input order, so the same word list always clusters the
//! same way.

use std::hash::Hash;

use indexmap::IndexSet;
use ndarray::Array1;
use num::integer::Roots;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    corpus::{document::Document, Word},
    error::{Error, Result},
    index::Index,
    utils::{math::proximity, sort::argmax_first},
};

use super::{Group, Groups, Magnet, VectorGroup};

/// K-means settings.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Upper bound on assignment rounds when memberships keep changing.
    pub max_iterations: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self { max_iterations: 100 }
    }
}

impl KMeansConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iterations",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Clusters the vocabulary of a word list; a word's vector is its LSI row.
#[derive(Debug, Clone, Default)]
pub struct WordKMeans {
    config: KMeansConfig,
}

impl WordKMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }
}

impl Magnet<Word> for WordKMeans {
    type Output = Groups<Word>;

    fn apply(&self, words: &[Word]) -> Result<Groups<Word>> {
        self.config.validate()?;
        let index = Index::create_index(words)?;
        let lsi = index.lsi_matrix();
        let items: Vec<(Word, Array1<f64>)> = index
            .word_list()
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), lsi.row(i).to_owned()))
            .collect();
        let clusters = kmeans(items, &self.config)?;
        Ok(Groups::new(clusters.into_iter().map(Group::from).collect(), Some(index)))
    }
}

/// Clusters the documents a word list occurs in; a document's vector is its
/// LSI column.
#[derive(Debug, Clone, Default)]
pub struct DocumentKMeans {
    config: KMeansConfig,
}

impl DocumentKMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }
}

impl Magnet<Word> for DocumentKMeans {
    type Output = Groups<Document>;

    fn apply(&self, words: &[Word]) -> Result<Groups<Document>> {
        self.config.validate()?;
        let index = Index::create_index(words)?;
        let lsi = index.lsi_matrix();
        let items: Vec<(Document, Array1<f64>)> = index
            .doc_set()
            .iter()
            .enumerate()
            .map(|(j, d)| (d.clone(), lsi.column(j).to_owned()))
            .collect();
        let clusters = kmeans(items, &self.config)?;
        Ok(Groups::new(clusters.into_iter().map(Group::from).collect(), Some(index)))
    }
}

/// Cluster `items` (item, vector) into at most ⌊√n⌋ groups
pub fn kmeans<T>(items: Vec<(T, Array1<f64>)>, config: &KMeansConfig) -> Result<Vec<VectorGroup<T>>>
where
    T: Clone + Eq + Hash + Send + Sync,
{
    let n = items.len();
    let k = n.sqrt();
    if k == 0 {
        return Err(Error::EmptyInput { what: "items" });
    }
    let dim = items[0].1.len();

    let mut clusters: Vec<VectorGroup<T>> = (0..k).map(|_| VectorGroup::new(dim)).collect();
    let mut assignment: Vec<Option<usize>> = vec![None; n];
    for (c, (item, vector)) in items.iter().take(k).enumerate() {
        clusters[c].add(item.clone(), vector.clone())?;
        assignment[c] = Some(c);
    }
    let mut previous = memberships(&clusters);

    let mut rounds = 0;
    loop {
        rounds += 1;
        for cluster in clusters.iter_mut() {
            cluster.update_centroid();
        }

        let centroids: Vec<&Array1<f64>> = clusters
            .iter()
            .filter_map(VectorGroup::centroid)
            .collect();
        let best: Vec<usize> = items
            .par_iter()
            .map(|(_, vector)| {
                let scores: Vec<f64> = centroids
                    .iter()
                    .map(|c| proximity(vector.view(), c.view()))
                    .collect();
                argmax_first(&scores).unwrap_or(0)
            })
            .collect();

        for (i, (item, vector)) in items.iter().enumerate() {
            if let Some(current) = assignment[i] {
                clusters[current].remove(item);
            }
            clusters[best[i]].add(item.clone(), vector.clone())?;
            assignment[i] = Some(best[i]);
        }

        let current = memberships(&clusters);
        if current == previous {
            break;
        }
        if rounds >= config.max_iterations {
            warn!(rounds, "k-means stopped before memberships settled");
            break;
        }
        previous = current;
    }

    debug!(items = n, clusters = k, rounds, "k-means converged");
    Ok(clusters)
}

fn memberships<T>(clusters: &[VectorGroup<T>]) -> Vec<IndexSet<T>>
where
    T: Clone + Eq + Hash,
{
    clusters
        .iter()
        .map(|c| c.items().cloned().collect())
        .collect()
}
