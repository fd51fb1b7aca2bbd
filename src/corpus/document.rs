use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Document
/// クラスまたはメソッドの識別子
///
/// Identity is the `path#method` string (`path` alone when the document is a
/// class). `id` is the dense position assigned by the `Index` that created
/// the document and is meaningless outside that index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: usize,
    path: String,
    method: String,
    namespace: String,
    short_name: String,
    transformed_name: String,
}

impl Document {
    /// Build a document from its parts
    ///
    /// `transformed_name` starts out equal to `short_name`; the normalization
    /// layer replaces it with `with_transformed_name`.
    pub fn new(id: usize, path: &str, method: &str) -> Self {
        let (namespace, class_name) = split_path(path);
        let short_name = if method.is_empty() { class_name } else { method };
        Self {
            id,
            path: path.to_string(),
            method: method.to_string(),
            namespace: namespace.to_string(),
            short_name: short_name.to_string(),
            transformed_name: short_name.to_string(),
        }
    }

    /// Parse a container id (`path#method` or `path`)
    pub fn from_container(id: usize, container: &str) -> Self {
        match container.split_once('#') {
            Some((path, method)) => Self::new(id, path, method),
            None => Self::new(id, container, ""),
        }
    }

    /// Replace the canonical (singularized, spell-corrected) short name
    pub fn with_transformed_name(mut self, name: &str) -> Self {
        self.transformed_name = name.to_string();
        self
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    #[inline]
    pub fn transformed_name(&self) -> &str {
        &self.transformed_name
    }

    /// `path#method`, or `path` for class documents
    pub fn qualified_name(&self) -> String {
        if self.method.is_empty() {
            self.path.clone()
        } else {
            format!("{}#{}", self.path, self.method)
        }
    }
}

/// `a.b.Box` -> (`a.b`, `Box`); also accepts `/` and `\` separators
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind(['.', '/', '\\']) {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.method == other.method
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.method.hash(state);
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}
