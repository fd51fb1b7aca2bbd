/// This crate is a text-mining engine for identifier words: an LSI index,
/// cosine-style ranking, and document/word clustering.
pub mod corpus;
pub mod error;
pub mod grouping;
pub mod index;
pub mod utils;

/// Word
/// A normalized token with its occurrence count and the ids of the documents
/// (`path#method`) it occurred in.
///
/// Equality and hashing use the lowercased token only.
/// Tokenization, stop-word filtering, spelling correction and
/// singularization happen before words reach this crate.
pub use corpus::Word;

/// Document
/// A class or method identity: path, method, namespace, short name and
/// transformed (canonical) short name.
///
/// Equality is the `path#method` string. The `id` is assigned by the `Index`
/// that created the document and only means something inside that index.
pub use corpus::document::Document;

/// Project
/// A named word set, the input of the wordset magnets.
pub use corpus::project::Project;

/// Index
/// Vector-space index over a fixed word list.
///
/// Internally, it holds:
/// - The vocabulary (first-seen order, case-insensitive)
/// - The documents (one per distinct container id, first-seen order)
/// - The word × document frequency matrix
/// - The word × document LSI matrix (truncated SVD, rank ⌊√vocabulary⌋)
/// - Optionally a word × document TF-IDF matrix
///
/// An index is built once per corpus; build a new one for a new corpus.
pub use index::Index;

/// Query and Hits
/// `Query` ranks documents against words (`method_search`) or words against
/// documents (`type_search`) over an index's LSI matrix.
/// `Hits` holds the (item, score) results, best first, scores always positive.
pub use index::query::{Hits, Query};

/// Grouping
/// Clustering strategies (`Magnet`s) and their result containers.
///
/// - `WordKMeans` / `DocumentKMeans`: centroid clustering over LSI vectors
/// - `UnionFindMagnet`: name-similarity graph, forest union and orphan
///   reattachment over documents
/// - `IntersectionMagnet` / `JaccardMagnet`: project clustering by shared words
/// - `prune_doc_groups`: typicality-based removal of outlier documents
/// - `regroups`: splitting oversized groups
pub use grouping::{
    kmeans::{DocumentKMeans, KMeansConfig, WordKMeans},
    prune::{prune_doc_groups, PruneConfig},
    regroups,
    union_find::{UnionFindConfig, UnionFindMagnet},
    wordset::{IntersectionMagnet, JaccardMagnet, WordsetConfig, WordsetMagnet},
    Group, Grouping, Groups, Magnet, VectorGroup,
};

/// Error and Result types
pub use error::{Error, Result};
