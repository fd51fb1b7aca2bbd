use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::Word;

/// Project
/// A named bag of words, clustered by the wordset magnets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    name: String,
    words: IndexSet<Word>,
}

impl Project {
    pub fn new<I>(name: &str, words: I) -> Self
    where
        I: IntoIterator<Item = Word>,
    {
        Self {
            name: name.to_string(),
            words: words.into_iter().collect(),
        }
    }

    /// Build a project from bare token strings
    pub fn from_tokens<T>(name: &str, tokens: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        Self::new(name, tokens.iter().map(|t| Word::new(t.as_ref())))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn words(&self) -> &IndexSet<Word> {
        &self.words
    }

    /// Words present in both projects, in `self`'s order
    pub fn shared_words(&self, other: &Project) -> IndexSet<Word> {
        self.words.intersection(&other.words).cloned().collect()
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Project {}

impl Hash for Project {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
