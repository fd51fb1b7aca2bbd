use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use crate::error::{Error, Result};

use super::{Index, Phase};

impl Index {
    /// TF-IDF weighting of the frequency matrix
    ///
    /// tf(i, j) = count(i, j) / Σ_i count(i, j)
    /// idf(i) = ln(1 + docs / (df(i) + 1))
    ///
    /// Reads the frequency matrix and writes a separate matrix. Documents
    /// without recorded words keep an all-zero column.
    pub fn create_tfidf_matrix(&mut self) -> Result<&mut Self> {
        if self.phase < Phase::Counted {
            return Err(Error::NotIndexed { phase: "create_tfidf_matrix" });
        }
        let doc_num = self.frequency.ncols() as f64;
        let idf: Array1<f64> = self
            .frequency
            .axis_iter(Axis(0))
            .map(|row| {
                let df = row.iter().filter(|&&c| c > 0.0).count() as f64;
                (1.0 + doc_num / (df + 1.0)).ln()
            })
            .collect();

        let mut tfidf = Array2::<f64>::zeros(self.frequency.raw_dim());
        for (j, col) in self.frequency.axis_iter(Axis(1)).enumerate() {
            let total: f64 = col.sum();
            if total == 0.0 {
                continue;
            }
            for (i, &count) in col.iter().enumerate() {
                tfidf[[i, j]] = count / total * idf[i];
            }
        }
        self.tfidf = tfidf;
        debug!(shape = ?self.tfidf.dim(), "built tf-idf matrix");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::corpus::Word;

    use super::*;

    #[test]
    fn rare_words_weigh_more() {
        let words = vec![
            Word::with_containers("sort", 2, ["A#sort", "B#sort"]),
            Word::with_containers("pivot", 1, ["A#sort"]),
        ];
        let mut index = Index::new();
        index.index(&words).unwrap().create_word_doc_matrix().unwrap();
        index.create_tfidf_matrix().unwrap();
        let m = index.tfidf_matrix();

        let idf_sort = (1.0f64 + 2.0 / 3.0).ln();
        let idf_pivot = (1.0f64 + 2.0 / 2.0).ln();
        assert!((m[[0, 0]] - 0.5 * idf_sort).abs() < 1e-12);
        assert!((m[[1, 0]] - 0.5 * idf_pivot).abs() < 1e-12);
        assert!((m[[0, 1]] - idf_sort).abs() < 1e-12);
        assert_eq!(m[[1, 1]], 0.0);
        assert!(m[[1, 0]] > m[[0, 0]]);
    }

    #[test]
    fn tfidf_requires_counts() {
        let mut index = Index::new();
        assert!(matches!(
            index.create_tfidf_matrix(),
            Err(Error::NotIndexed { .. })
        ));
    }
}
