//! Project clustering by vocabulary overlap.
//!
//! Every project is paired with its best-scoring partner. Pairs sharing more
//! than `overlap` words link the two projects; linked projects form a
//! cluster whose bucket is the union of the shared words. Projects that no
//! pair links ("missed") join the first bucket with the largest overlap with
//! their own words, or stay on their own.

use indexmap::IndexSet;
use tracing::debug;

use crate::{
    corpus::{project::Project, Word},
    error::{Error, Result},
    utils::{datastruct::union_find::UnionFind, similarity::jaccard, sort::argmax_first},
};

use super::{Group, Groups, Magnet};

const MIN_OVERLAP: usize = 3;
const MAX_OVERLAP: usize = 30;

/// Score of a project pair; higher is closer.
pub trait WordsetScore {
    fn score(&self, a: &Project, b: &Project) -> f64;
}

/// Raw intersection size.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intersection;

impl WordsetScore for Intersection {
    fn score(&self, a: &Project, b: &Project) -> f64 {
        a.words().intersection(b.words()).count() as f64
    }
}

/// Jaccard index of the word sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard;

impl WordsetScore for Jaccard {
    fn score(&self, a: &Project, b: &Project) -> f64 {
        jaccard(a.words(), b.words())
    }
}

#[derive(Debug, Clone)]
pub struct WordsetConfig {
    /// Shared words a pair must exceed to link; clamped into [3, 30].
    pub overlap: usize,
}

impl Default for WordsetConfig {
    fn default() -> Self {
        Self { overlap: MIN_OVERLAP }
    }
}

impl WordsetConfig {
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap.clamp(MIN_OVERLAP, MAX_OVERLAP);
        self
    }

    fn overlap(&self) -> usize {
        self.overlap.clamp(MIN_OVERLAP, MAX_OVERLAP)
    }
}

/// Overlap clustering with a pluggable pair score
#[derive(Debug, Clone, Default)]
pub struct WordsetMagnet<S> {
    scorer: S,
    config: WordsetConfig,
}

pub type IntersectionMagnet = WordsetMagnet<Intersection>;
pub type JaccardMagnet = WordsetMagnet<Jaccard>;

impl<S> WordsetMagnet<S>
where
    S: WordsetScore,
{
    pub fn new(scorer: S, config: WordsetConfig) -> Self {
        Self { scorer, config }
    }

    /// Best partner of project `i`, first one on ties
    fn best_partner(&self, projects: &[Project], i: usize) -> Option<usize> {
        let scores: Vec<f64> = projects
            .iter()
            .enumerate()
            .map(|(j, other)| {
                if j == i {
                    f64::NAN
                } else {
                    self.scorer.score(&projects[i], other)
                }
            })
            .collect();
        argmax_first(&scores)
    }
}

impl<S> Magnet<Project> for WordsetMagnet<S>
where
    S: WordsetScore,
{
    type Output = Groups<Project>;

    fn apply(&self, projects: &[Project]) -> Result<Groups<Project>> {
        if projects.is_empty() {
            return Err(Error::EmptyInput { what: "projects" });
        }
        let names: IndexSet<&str> = projects.iter().map(Project::name).collect();
        if names.len() != projects.len() {
            return Err(Error::InvalidParameter {
                name: "projects",
                message: "project names must be unique",
            });
        }
        let overlap = self.config.overlap();

        let mut sets = UnionFind::new(projects.len());
        let mut shared: Vec<(usize, IndexSet<Word>)> = Vec::new();
        for i in 0..projects.len() {
            let Some(j) = self.best_partner(projects, i) else {
                continue;
            };
            let words = projects[i].shared_words(&projects[j]);
            if words.len() > overlap {
                sets.union(i, j);
                shared.push((i, words));
            }
        }

        // bucket words per cluster, keyed by the cluster's first member
        let classes = sets.classes();
        let mut buckets: Vec<(Vec<usize>, IndexSet<Word>)> = Vec::new();
        let mut missed: Vec<usize> = Vec::new();
        for class in classes {
            if class.len() == 1 {
                missed.push(class[0]);
                continue;
            }
            let mut words = IndexSet::new();
            for (i, w) in &shared {
                if class.contains(i) {
                    words.extend(w.iter().cloned());
                }
            }
            buckets.push((class, words));
        }
        debug!(buckets = buckets.len(), missed = missed.len(), overlap, "linked projects");

        let mut singles: Vec<usize> = Vec::new();
        for m in missed {
            let overlaps: Vec<f64> = buckets
                .iter()
                .map(|(_, words)| words.intersection(projects[m].words()).count() as f64)
                .collect();
            match argmax_first(&overlaps).filter(|&b| overlaps[b] > 0.0) {
                Some(b) => buckets[b].0.push(m),
                None => singles.push(m),
            }
        }

        let groups: Vec<Group<Project>> = buckets
            .into_iter()
            .map(|(members, _)| members)
            .chain(singles.into_iter().map(|m| vec![m]))
            .map(|members| members.into_iter().map(|i| projects[i].clone()).collect())
            .collect();
        Ok(Groups::new(groups, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, tokens: &[&str]) -> Project {
        Project::from_tokens(name, tokens)
    }

    fn names(groups: &Groups<Project>) -> Vec<Vec<&str>> {
        groups.iter().map(|g| g.iter().map(Project::name).collect()).collect()
    }

    fn fixture() -> Vec<Project> {
        vec![
            project("geo", &["point", "line", "polygon", "area", "shape", "draw"]),
            project("gfx", &["point", "line", "polygon", "area", "shape", "pixel"]),
            project("sketch", &["shape", "draw", "pixel", "canvas"]),
            project("net", &["socket", "packet", "route", "stream"]),
        ]
    }

    #[test]
    fn overlapping_projects_cluster_and_missed_join_buckets() {
        let groups = IntersectionMagnet::default().apply(&fixture()).unwrap();
        // geo/gfx share 5 words; sketch shares `shape` with their bucket
        assert_eq!(names(&groups), vec![vec!["geo", "gfx", "sketch"], vec!["net"]]);
    }

    #[test]
    fn jaccard_scorer_links_the_same_pair() {
        let groups = JaccardMagnet::default().apply(&fixture()).unwrap();
        assert_eq!(names(&groups)[0][..2], ["geo", "gfx"]);
        assert_eq!(groups.item_count(), 4);
    }

    #[test]
    fn high_overlap_threshold_leaves_singletons() {
        let magnet = WordsetMagnet::new(Intersection, WordsetConfig::default().with_overlap(10));
        let groups = magnet.apply(&fixture()).unwrap();
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn overlap_is_clamped() {
        assert_eq!(WordsetConfig::default().with_overlap(0).overlap, 3);
        assert_eq!(WordsetConfig::default().with_overlap(99).overlap, 30);
        let raw = WordsetConfig { overlap: 1 };
        assert_eq!(raw.overlap(), 3);
    }

    #[test]
    fn scores() {
        let p = fixture();
        assert_eq!(Intersection.score(&p[0], &p[1]), 5.0);
        assert!((Jaccard.score(&p[0], &p[1]) - 5.0 / 7.0).abs() < 1e-12);
        assert_eq!(Intersection.score(&p[0], &p[3]), 0.0);
    }

    #[test]
    fn rejects_empty_and_duplicate_names() {
        assert!(matches!(
            IntersectionMagnet::default().apply(&[]),
            Err(Error::EmptyInput { .. })
        ));
        let dup = vec![project("a", &["x"]), project("a", &["y"])];
        assert!(matches!(
            IntersectionMagnet::default().apply(&dup),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
