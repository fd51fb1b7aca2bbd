pub mod lsi;
pub mod query;
pub mod tfidf;

use indexmap::IndexSet;
use ndarray::{Array2, ArrayView1};
use tracing::debug;

use crate::{
    corpus::{document::Document, Word},
    error::{Error, Result},
};

/// Pipeline position of an `Index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Empty,
    Indexed,
    Counted,
    Reduced,
}

/// インデックス
/// Vector-space index over a fixed word/document universe.
///
/// Built once, in three phases:
/// 1. `index` - vocabulary, documents and per-document word lists
/// 2. `create_word_doc_matrix` - word × document occurrence counts
/// 3. `create_lsi_matrix` - truncated-SVD reduction of the counts
///
/// `Index::create_index` runs all three. Matrices never change after their
/// phase has run; accessors hand out read-only views.
///
/// Vocabulary and documents keep first-seen order, so positions (and every
/// clustering seeded from them) are reproducible for the same input list.
#[derive(Debug, Clone)]
pub struct Index {
    /// vocabulary, row order of every word-major matrix
    vocabulary: IndexSet<Word>,
    /// documents, column order of every word-major matrix
    documents: IndexSet<Document>,
    /// words recorded against each document (aligned with `documents`)
    doc_words: Vec<Vec<Word>>,
    /// |vocabulary| × |documents| raw counts
    frequency: Array2<f64>,
    /// |vocabulary| × |documents| tf-idf weights
    tfidf: Array2<f64>,
    /// |vocabulary| × |documents| LSI weights
    lsi: Array2<f64>,
    phase: Phase,
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

impl Index {
    /// 新しい空のインデックス
    pub fn new() -> Self {
        Self {
            vocabulary: IndexSet::new(),
            documents: IndexSet::new(),
            doc_words: Vec::new(),
            frequency: Array2::zeros((0, 0)),
            tfidf: Array2::zeros((0, 0)),
            lsi: Array2::zeros((0, 0)),
            phase: Phase::Empty,
        }
    }

    /// Run the whole pipeline over `words`
    pub fn create_index(words: &[Word]) -> Result<Self> {
        let mut index = Self::new();
        index.index(words)?;
        index.create_word_doc_matrix()?;
        index.create_lsi_matrix()?;
        Ok(index)
    }

    /// Phase 1: collect documents, vocabulary and per-document word lists
    ///
    /// One document per distinct container string, numbered in first-seen
    /// order. Words compare case-insensitively, so the vocabulary keeps the
    /// first spelling it meets.
    ///
    /// # Arguments
    /// * `words` - counted words, each tagged with its containers
    pub fn index(&mut self, words: &[Word]) -> Result<&mut Self> {
        if words.is_empty() {
            return Err(Error::EmptyInput { what: "words" });
        }
        if self.phase != Phase::Empty {
            *self = Self::new();
        }

        for word in words {
            self.vocabulary.insert(word.clone());
            for container in word.containers() {
                let doc = Document::from_container(self.documents.len(), container);
                let (pos, added) = self.documents.insert_full(doc);
                if added {
                    self.doc_words.push(Vec::new());
                }
                self.doc_words[pos].push(word.clone());
            }
        }

        self.phase = Phase::Indexed;
        debug!(
            words = self.vocabulary.len(),
            documents = self.documents.len(),
            "indexed word list"
        );
        Ok(self)
    }

    /// Phase 2: cell (i, j) = occurrences of vocabulary word i in document j
    pub fn create_word_doc_matrix(&mut self) -> Result<&mut Self> {
        if self.phase < Phase::Indexed {
            return Err(Error::NotIndexed { phase: "create_word_doc_matrix" });
        }

        let mut frequency = Array2::<f64>::zeros((self.vocabulary.len(), self.documents.len()));
        for (j, words) in self.doc_words.iter().enumerate() {
            for word in words {
                if let Some(i) = self.vocabulary.get_index_of(word) {
                    frequency[[i, j]] += 1.0;
                }
            }
        }
        self.frequency = frequency;
        self.phase = Phase::Counted;
        debug!(shape = ?self.frequency.dim(), "built word/document frequency matrix");
        Ok(self)
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Vocabulary in row order
    #[inline]
    pub fn word_list(&self) -> &IndexSet<Word> {
        &self.vocabulary
    }

    /// Documents in column order
    #[inline]
    pub fn doc_set(&self) -> &IndexSet<Document> {
        &self.documents
    }

    /// Raw |vocabulary| × |documents| counts (0×0 before phase 2)
    #[inline]
    pub fn word_frequency_matrix(&self) -> &Array2<f64> {
        &self.frequency
    }

    /// Word-major LSI matrix (0×0 before phase 3)
    #[inline]
    pub fn lsi_matrix(&self) -> &Array2<f64> {
        &self.lsi
    }

    /// Word-major tf-idf matrix (0×0 until `create_tfidf_matrix` runs)
    #[inline]
    pub fn tfidf_matrix(&self) -> &Array2<f64> {
        &self.tfidf
    }

    /// Words recorded against `doc`
    pub fn words_of(&self, doc: &Document) -> Option<&[Word]> {
        self.documents
            .get_index_of(doc)
            .map(|j| self.doc_words[j].as_slice())
    }

    /// Row of `token` in the word-major matrices
    pub fn word_position(&self, token: &str) -> Option<usize> {
        self.vocabulary.get_index_of(&Word::new(token))
    }

    /// Column of `doc` in the word-major matrices
    pub fn document_position(&self, doc: &Document) -> Option<usize> {
        self.documents.get_index_of(doc)
    }

    /// Document as stored by this index (carries the index-assigned id)
    pub fn document(&self, position: usize) -> Option<&Document> {
        self.documents.get_index(position)
    }

    /// LSI weights of word `i` across documents
    pub fn word_vector(&self, i: usize) -> Option<ArrayView1<'_, f64>> {
        (i < self.lsi.nrows()).then(|| self.lsi.row(i))
    }

    /// LSI weights of document `j` across the vocabulary
    pub fn document_vector(&self, j: usize) -> Option<ArrayView1<'_, f64>> {
        (j < self.lsi.ncols()).then(|| self.lsi.column(j))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn sort_pivot() -> Vec<Word> {
        vec![
            Word::with_containers("sort", 2, ["A#sort", "B#sort"]),
            Word::with_containers("pivot", 1, ["A#sort"]),
        ]
    }

    #[test]
    fn frequency_matrix_matches_containers() {
        let mut index = Index::new();
        index.index(&sort_pivot()).unwrap();
        index.create_word_doc_matrix().unwrap();

        let docs: Vec<String> = index.doc_set().iter().map(|d| d.qualified_name()).collect();
        assert_eq!(docs, vec!["A#sort", "B#sort"]);
        let words: Vec<&str> = index.word_list().iter().map(|w| w.element()).collect();
        assert_eq!(words, vec!["sort", "pivot"]);
        assert_eq!(index.word_frequency_matrix(), &array![[1.0, 1.0], [1.0, 0.0]]);
    }

    #[test]
    fn document_ids_follow_first_seen_order() {
        let index = Index::create_index(&sort_pivot()).unwrap();
        for (pos, doc) in index.doc_set().iter().enumerate() {
            assert_eq!(doc.id(), pos);
        }
        assert_eq!(index.phase(), Phase::Reduced);
    }

    #[test]
    fn duplicate_words_merge_case_insensitively() {
        let words = vec![
            Word::with_containers("Sort", 1, ["A#run"]),
            Word::with_containers("sort", 1, ["A#run", "B#run"]),
        ];
        let mut index = Index::new();
        index.index(&words).unwrap().create_word_doc_matrix().unwrap();
        assert_eq!(index.word_list().len(), 1);
        assert_eq!(index.word_frequency_matrix(), &array![[2.0, 1.0]]);
        let a = Document::from_container(0, "A#run");
        assert_eq!(index.words_of(&a).map(<[Word]>::len), Some(2));
        assert_eq!(index.word_position("SORT"), Some(0));
    }

    #[test]
    fn phases_must_run_in_order() {
        let mut index = Index::new();
        assert_eq!(
            index.create_word_doc_matrix().unwrap_err(),
            Error::NotIndexed { phase: "create_word_doc_matrix" }
        );
        assert_eq!(index.index(&[]).unwrap_err(), Error::EmptyInput { what: "words" });
    }

    #[test]
    fn dimensions_are_consistent() {
        let words = vec![
            Word::with_containers("box", 1, ["Box", "BoxShape"]),
            Word::with_containers("shape", 1, ["BoxShape", "Circle"]),
            Word::with_containers("area", 1, ["Box", "Circle", "Square"]),
            Word::with_containers("radius", 1, ["Circle"]),
        ];
        let index = Index::create_index(&words).unwrap();
        let (rows, cols) = index.word_frequency_matrix().dim();
        assert_eq!(rows, index.word_list().len());
        assert_eq!(cols, index.doc_set().len());
        assert_eq!(index.lsi_matrix().dim(), (rows, cols));
        assert!(index.word_vector(rows).is_none());
        assert_eq!(index.document_vector(0).map(|v| v.len()), Some(rows));
    }
}
