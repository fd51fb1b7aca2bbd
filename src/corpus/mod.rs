pub mod document;
pub mod project;

use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Word
/// 正規化済みのトークン
///
/// - `element`: lowercased token string
/// - `count`: number of times the token was seen by the harvesting layer
/// - `containers`: ids (`path#method`) of the documents it occurred in,
///   in first-seen order
///
/// Equality and hashing look at `element` only, so `"Sort"` and `"sort"` are
/// the same word. Deserialization lowercases `element` as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "WordRecord")]
pub struct Word {
    element: String,
    count: u64,
    containers: IndexSet<String>,
}

impl Word {
    /// Create a word seen once, with no containers yet
    pub fn new(element: &str) -> Self {
        Self {
            element: element.to_lowercase(),
            count: 1,
            containers: IndexSet::new(),
        }
    }

    /// Create a word with its count and containers already known
    ///
    /// # Arguments
    /// * `element` - token string (lowercased here)
    /// * `count` - occurrence count
    /// * `containers` - document ids the token occurred in
    pub fn with_containers<I, S>(element: &str, count: u64, containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            element: element.to_lowercase(),
            count,
            containers: containers.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn element(&self) -> &str {
        &self.element
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn containers(&self) -> &IndexSet<String> {
        &self.containers
    }

    /// Increment the occurrence count by `step`
    #[inline]
    pub fn count(&mut self, step: u64) -> &mut Self {
        self.count += step;
        self
    }

    /// Record a container; returns false if it was already known
    pub fn add_container(&mut self, container: &str) -> bool {
        self.containers.insert(container.to_string())
    }

    /// true when the word occurred inside `container`
    pub fn occurs_in(&self, container: &str) -> bool {
        self.containers.contains(container)
    }
}

/// Serialized shape of `Word`
#[derive(Deserialize)]
struct WordRecord {
    element: String,
    count: u64,
    #[serde(default)]
    containers: IndexSet<String>,
}

impl From<WordRecord> for Word {
    fn from(record: WordRecord) -> Self {
        Self {
            element: record.element.to_lowercase(),
            count: record.count,
            containers: record.containers,
        }
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element)
    }
}
