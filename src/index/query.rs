use std::fmt::Debug;

use indexmap::IndexSet;
use ndarray::{Array1, ArrayView2, Axis};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::{
    corpus::{document::Document, Word},
    error::{Error, Result},
    utils::{math::{l1_normalize, proximity}, sort::sort_by_score_desc},
};

use super::{Index, Phase};

/// Structure to store search results
#[derive(Clone, Serialize)]
pub struct Hits<T> {
    /// (item, score), best first once sorted
    pub list: Vec<(T, f64)>,
}

impl<T> Hits<T> {
    /// Create a new Hits instance
    pub fn new(list: Vec<(T, f64)>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score, ties in index order
    pub fn sort_by_score(&mut self) -> &mut Self {
        sort_by_score_desc(&mut self.list);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.list.iter().map(|(item, _)| item)
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.list.iter().map(|(_, score)| *score)
    }

    pub fn into_items(self) -> Vec<T> {
        self.list.into_iter().map(|(item, _)| item).collect()
    }
}

impl<T> Debug for Hits<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            // one hit per line
            writeln!(f, "Hits [")?;
            for (item, score) in &self.list {
                writeln!(f, "    {:?}: {:.6}", item, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// 検索
/// Ranks documents or words of an `Index` against a query.
///
/// Both directions score with `proximity` over the LSI matrix and keep only
/// strictly positive scores, best first.
pub struct Query<'a> {
    index: &'a Index,
}

impl<'a> Query<'a> {
    pub fn new(index: &'a Index) -> Self {
        Self { index }
    }

    /// Documents ranked against a set of query words
    ///
    /// The query vector has 1.0 at every vocabulary position matching a
    /// query word, L1-normalized; each document column of the LSI matrix is
    /// scored against it.
    pub fn method_search(&self, query_words: &[Word]) -> Result<Hits<Document>> {
        if query_words.is_empty() {
            return Err(Error::EmptyInput { what: "query_words" });
        }
        let lsi = self.reduced_matrix()?;
        let wanted: IndexSet<&Word> = query_words.iter().collect();
        let query: Array1<f64> = self
            .index
            .word_list()
            .iter()
            .map(|w| if wanted.contains(w) { 1.0 } else { 0.0 })
            .collect();

        let hits = rank(query, lsi, |j| self.index.document(j).cloned());
        debug!(query = query_words.len(), hits = hits.len(), "method search");
        Ok(hits)
    }

    /// Words ranked against a set of query documents
    ///
    /// Same as `method_search` with words and documents swapped: the query
    /// lives in document space and the transposed LSI matrix is scanned.
    pub fn type_search(&self, documents: &[Document]) -> Result<Hits<Word>> {
        if documents.is_empty() {
            return Err(Error::EmptyInput { what: "documents" });
        }
        let lsi = self.reduced_matrix()?;
        let wanted: IndexSet<&Document> = documents.iter().collect();
        let query: Array1<f64> = self
            .index
            .doc_set()
            .iter()
            .map(|d| if wanted.contains(d) { 1.0 } else { 0.0 })
            .collect();

        let hits = rank(query, lsi.t(), |i| self.index.word_list().get_index(i).cloned());
        debug!(query = documents.len(), hits = hits.len(), "type search");
        Ok(hits)
    }

    fn reduced_matrix(&self) -> Result<ArrayView2<'a, f64>> {
        if self.index.phase() < Phase::Reduced {
            return Err(Error::NotIndexed { phase: "query" });
        }
        Ok(self.index.lsi_matrix().view())
    }
}

/// Score every column of `matrix` against `query`
fn rank<T, F>(mut query: Array1<f64>, matrix: ArrayView2<'_, f64>, lookup: F) -> Hits<T>
where
    F: Fn(usize) -> Option<T>,
{
    l1_normalize(&mut query);
    let scored: Vec<(usize, f64)> = (0..matrix.ncols())
        .into_par_iter()
        .map(|j| (j, proximity(query.view(), matrix.index_axis(Axis(1), j))))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    let mut hits = Hits::new(
        scored
            .into_iter()
            .filter_map(|(j, score)| lookup(j).map(|item| (item, score)))
            .collect(),
    );
    hits.sort_by_score();
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes() -> Index {
        let words = vec![
            Word::with_containers("box", 1, ["Box", "BoxShape"]),
            Word::with_containers("shape", 1, ["BoxShape", "Circle", "Square"]),
            Word::with_containers("area", 1, ["Box", "Circle", "Square"]),
            Word::with_containers("radius", 1, ["Circle"]),
            Word::with_containers("side", 1, ["Square", "Box"]),
            Word::with_containers("render", 1, ["Canvas"]),
        ];
        Index::create_index(&words).unwrap()
    }

    #[test]
    fn method_search_ranks_positive_scores_descending() {
        let index = shapes();
        let hits = Query::new(&index).method_search(&[Word::new("radius")]).unwrap();
        assert!(!hits.is_empty());
        let scores: Vec<f64> = hits.scores().collect();
        assert!(scores.iter().all(|&s| s > 0.0));
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn type_search_returns_words() {
        let index = shapes();
        let circle = Document::from_container(0, "Circle");
        let hits = Query::new(&index).type_search(&[circle]).unwrap();
        assert!(hits.items().all(|w| index.word_list().contains(w)));
        let scores: Vec<f64> = hits.scores().collect();
        assert!(scores.iter().all(|&s| s > 0.0));
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn unknown_query_word_matches_nothing() {
        let index = shapes();
        let hits = Query::new(&index).method_search(&[Word::new("zebra")]).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn query_needs_a_reduced_index() {
        let mut index = Index::new();
        index.index(&[Word::with_containers("a", 1, ["X"])]).unwrap();
        let err = Query::new(&index).method_search(&[Word::new("a")]).unwrap_err();
        assert_eq!(err, Error::NotIndexed { phase: "query" });
        let err = Query::new(&index).type_search(&[]).unwrap_err();
        assert_eq!(err, Error::EmptyInput { what: "documents" });
    }

    #[test]
    fn hits_pretty_debug() {
        let hits = Hits::new(vec![("a", 0.5), ("b", 0.25)]);
        let text = format!("{:#?}", hits);
        assert!(text.contains("\"a\": 0.500000"));
        assert_eq!(hits.clone().into_items(), vec!["a", "b"]);
    }
}
