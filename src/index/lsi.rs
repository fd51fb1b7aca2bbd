use num::integer::Roots;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    utils::math::{normalize_columns, svd::Svd},
};

use super::{Index, Phase};

impl Index {
    /// Phase 3: latent semantic reduction of the frequency matrix
    ///
    /// 1. transpose the counts so documents are rows
    /// 2. truncated SVD with rank k = ⌊√columns⌋ (√ of the vocabulary size),
    ///    capped at min(rows, columns)
    /// 3. rebuild U_k · S_k · V_kᵀ into a fresh matrix
    /// 4. divide each column by its absolute sum (zero columns stay zero)
    /// 5. store the result transposed back to word-major orientation
    pub fn create_lsi_matrix(&mut self) -> Result<&mut Self> {
        if self.phase < Phase::Counted {
            return Err(Error::NotIndexed { phase: "create_lsi_matrix" });
        }

        let doc_major = self.frequency.t().to_owned();
        let (rows, cols) = doc_major.dim();
        let rank = cols.sqrt().min(rows);
        if rank < 1 {
            return Err(Error::Degenerate { rows, cols, rank });
        }

        let svd = Svd::new(&doc_major);
        trace!(singular_values = ?svd.s, "svd of document-major counts");
        let reduced = svd.reconstruct(rank);
        let weighted = normalize_columns(&reduced);

        self.lsi = weighted.t().to_owned();
        self.phase = Phase::Reduced;
        debug!(rows, cols, rank, "built lsi matrix");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::corpus::Word;

    use super::*;

    fn shapes() -> Vec<Word> {
        vec![
            Word::with_containers("box", 1, ["Box", "BoxShape"]),
            Word::with_containers("shape", 1, ["BoxShape", "Circle", "Square"]),
            Word::with_containers("area", 1, ["Box", "Circle", "Square"]),
            Word::with_containers("radius", 1, ["Circle"]),
            Word::with_containers("side", 1, ["Square", "Box"]),
        ]
    }

    #[test]
    fn lsi_rows_are_words_and_columns_sum_to_one() {
        let index = Index::create_index(&shapes()).unwrap();
        let lsi = index.lsi_matrix();
        assert_eq!(lsi.dim(), (5, 4));
        assert!(lsi.iter().all(|x| x.is_finite()));
        // normalization ran over the document-major columns, i.e. word rows here
        for row in lsi.rows() {
            let sum: f64 = row.iter().map(|x| x.abs()).sum();
            assert!(sum == 0.0 || (sum - 1.0).abs() < 1e-9, "row sum {sum}");
        }
    }

    #[test]
    fn lsi_requires_counts() {
        let mut index = Index::new();
        index.index(&shapes()).unwrap();
        assert_eq!(
            index.create_lsi_matrix().unwrap_err(),
            Error::NotIndexed { phase: "create_lsi_matrix" }
        );
    }

    #[test]
    fn empty_document_set_is_degenerate() {
        // words with no containers give a vocabulary but no documents
        let words = vec![Word::new("orphan")];
        let mut index = Index::new();
        index.index(&words).unwrap().create_word_doc_matrix().unwrap();
        assert_eq!(
            index.create_lsi_matrix().unwrap_err(),
            Error::Degenerate { rows: 0, cols: 1, rank: 0 }
        );
    }
}
