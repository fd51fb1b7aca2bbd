pub mod graph;
pub mod kmeans;
pub mod prune;
pub mod union_find;
pub mod wordset;

use std::hash::Hash;

use indexmap::IndexMap;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{
    corpus::{document::Document, project::Project, Word},
    error::{Error, Result},
    index::Index,
    utils::math::mean,
};

use self::{
    kmeans::{DocumentKMeans, WordKMeans},
    prune::{prune_doc_groups, PruneConfig},
    union_find::UnionFindMagnet,
    wordset::IntersectionMagnet,
};

/// Largest group `regroups` leaves alone is `DEFAULT_REGROUP_CAP - 1` items.
pub const DEFAULT_REGROUP_CAP: usize = 20;

/// Magnet
/// A clustering strategy: items in, clustering result out.
pub trait Magnet<I> {
    type Output;

    fn apply(&self, items: &[I]) -> Result<Self::Output>;
}

/// An unordered cluster, kept in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group<T> {
    items: Vec<T>,
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Group<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: T) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Remove the first occurrence of `item`
    pub fn remove(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.items.iter().position(|x| x == item) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(item)
    }

    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> From<Vec<T>> for Group<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Group<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

/// A group whose members carry vectors, plus their centroid.
///
/// The centroid is only recomputed by `update_centroid`; adding or removing
/// members leaves the previous centroid in place.
#[derive(Debug, Clone)]
pub struct VectorGroup<T>
where
    T: Eq + Hash,
{
    members: IndexMap<T, Array1<f64>>,
    centroid: Option<Array1<f64>>,
    dim: usize,
}

impl<T> VectorGroup<T>
where
    T: Eq + Hash,
{
    /// Empty group for vectors of length `dim`
    pub fn new(dim: usize) -> Self {
        Self {
            members: IndexMap::new(),
            centroid: None,
            dim,
        }
    }

    pub fn add(&mut self, item: T, vector: Array1<f64>) -> Result<&mut Self> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                found: vector.len(),
            });
        }
        self.members.insert(item, vector);
        Ok(self)
    }

    pub fn remove(&mut self, item: &T) -> Option<Array1<f64>> {
        self.members.shift_remove(item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.members.contains_key(item)
    }

    /// Mean of the member vectors; an empty group gets the zero vector
    pub fn update_centroid(&mut self) -> &Array1<f64> {
        let centroid = mean(self.members.values().map(|v| v.view()), self.dim)
            .unwrap_or_else(|| Array1::zeros(self.dim));
        self.centroid.insert(centroid)
    }

    /// Centroid as of the last `update_centroid`
    pub fn centroid(&self) -> Option<&Array1<f64>> {
        self.centroid.as_ref()
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.members.keys()
    }

    pub fn vector(&self, item: &T) -> Option<&Array1<f64>> {
        self.members.get(item)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> From<VectorGroup<T>> for Group<T>
where
    T: Eq + Hash,
{
    fn from(group: VectorGroup<T>) -> Self {
        group.members.into_keys().collect()
    }
}

/// Groups
/// The non-empty groups produced by one clustering call, plus the index
/// that produced them when there is one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Groups<T> {
    groups: Vec<Group<T>>,
    #[serde(skip)]
    index: Option<Index>,
}

impl<T> Groups<T> {
    /// Wrap `groups`, dropping empty ones
    pub fn new(groups: Vec<Group<T>>, index: Option<Index>) -> Self {
        Self {
            groups: groups.into_iter().filter(|g| !g.is_empty()).collect(),
            index,
        }
    }

    #[inline]
    pub fn group_list(&self) -> &[Group<T>] {
        &self.groups
    }

    #[inline]
    pub fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group<T>> {
        self.groups.iter()
    }

    /// The only group; fails unless there is exactly one
    pub fn single(&self) -> Result<&Group<T>> {
        match self.groups.as_slice() {
            [only] => Ok(only),
            other => Err(Error::SingletonExpected { found: other.len() }),
        }
    }

    /// Total number of items across all groups
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn into_groups(self) -> Vec<Group<T>> {
        self.groups
    }

    pub(crate) fn into_parts(self) -> (Vec<Group<T>>, Option<Index>) {
        (self.groups, self.index)
    }
}

/// Entry points that pick a default strategy for each kind of input.
pub struct Grouping;

impl Grouping {
    /// Cluster words by their LSI vectors
    pub fn group_words(words: &[Word]) -> Result<Groups<Word>> {
        WordKMeans::default().apply(words)
    }

    /// Cluster the documents the words occur in by their LSI vectors
    pub fn group_docs(words: &[Word]) -> Result<Groups<Document>> {
        DocumentKMeans::default().apply(words)
    }

    /// Cluster documents by name similarity
    pub fn group_by_graph(documents: &[Document]) -> Result<Groups<Document>> {
        UnionFindMagnet::default().apply(documents)
    }

    /// Cluster projects by shared vocabulary
    pub fn group_projects(projects: &[Project]) -> Result<Groups<Project>> {
        IntersectionMagnet::default().apply(projects)
    }

    /// Run any strategy
    pub fn group_with<I, M>(magnet: &M, items: &[I]) -> Result<M::Output>
    where
        M: Magnet<I>,
    {
        magnet.apply(items)
    }

    /// Drop atypical documents from each group
    pub fn prune_doc_groups(
        groups: Groups<Document>,
        config: &PruneConfig,
    ) -> Result<Groups<Document>> {
        prune_doc_groups(groups, config)
    }

    /// Split `group` until every piece holds fewer than `cap` items
    pub fn regroups<T>(group: &Group<T>, cap: usize) -> Result<Groups<T>>
    where
        T: Clone,
    {
        regroups(group, cap)
    }
}

/// 再分割
/// Recursively halves `group` (keeping item order) until every resulting
/// group holds fewer than `cap` items. No item is lost or duplicated.
pub fn regroups<T>(group: &Group<T>, cap: usize) -> Result<Groups<T>>
where
    T: Clone,
{
    if cap < 2 {
        return Err(Error::InvalidParameter {
            name: "cap",
            message: "must be at least 2",
        });
    }
    let mut out = Vec::new();
    bisect(group.items(), cap, &mut out);
    Ok(Groups::new(out, None))
}

fn bisect<T>(items: &[T], cap: usize, out: &mut Vec<Group<T>>)
where
    T: Clone,
{
    if items.len() < cap {
        out.push(Group::from(items.to_vec()));
        return;
    }
    let mid = (items.len() + 1) / 2;
    bisect(&items[..mid], cap, out);
    bisect(&items[mid..], cap, out);
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn groups_drop_empty_groups() {
        let groups = Groups::new(
            vec![Group::from(vec![1, 2]), Group::new(), Group::from(vec![3])],
            None,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.item_count(), 3);
        assert!(groups.index().is_none());
        assert_eq!(groups.single().unwrap_err(), Error::SingletonExpected { found: 2 });
    }

    #[test]
    fn single_group() {
        let groups = Groups::new(vec![Group::from(vec!["x"])], None);
        assert_eq!(groups.single().unwrap().items(), &["x"]);
    }

    #[test]
    fn group_add_remove() {
        let mut g = Group::new();
        g.add("a").add("b").add("a");
        assert_eq!(g.len(), 3);
        assert!(g.remove(&"a"));
        assert_eq!(g.items(), &["b", "a"]);
        assert!(!g.remove(&"z"));
        assert!(g.contains(&"a"));
    }

    #[test]
    fn centroid_is_explicit() {
        let mut g: VectorGroup<&str> = VectorGroup::new(2);
        g.add("a", array![1.0, 0.0]).unwrap();
        g.add("b", array![0.0, 1.0]).unwrap();
        assert!(g.centroid().is_none());
        assert_eq!(g.update_centroid(), &array![0.5, 0.5]);

        g.remove(&"b");
        assert_eq!(g.centroid(), Some(&array![0.5, 0.5]));
        assert_eq!(g.update_centroid(), &array![1.0, 0.0]);

        g.remove(&"a");
        assert_eq!(g.update_centroid(), &array![0.0, 0.0]);
        assert!(g.add("c", array![1.0]).is_err());
    }

    #[test]
    fn regroups_splits_below_cap() {
        let group: Group<usize> = (0..45).collect();
        let groups = regroups(&group, DEFAULT_REGROUP_CAP).unwrap();
        assert!(groups.iter().all(|g| g.len() < DEFAULT_REGROUP_CAP));
        let flat: Vec<usize> = groups.iter().flat_map(|g| g.iter().copied()).collect();
        assert_eq!(flat, (0..45).collect::<Vec<_>>());
    }

    #[test]
    fn regroups_keeps_small_groups() {
        let group: Group<usize> = (0..5).collect();
        let groups = Grouping::regroups(&group, 20).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(regroups(&group, 1).is_err());
    }

    #[test]
    fn groups_serialize_without_index() {
        let groups = Groups::new(vec![Group::from(vec!["a", "b"])], None);
        let json = serde_json::to_string(&groups).unwrap();
        assert_eq!(json, r#"{"groups":[{"items":["a","b"]}]}"#);
    }
}
