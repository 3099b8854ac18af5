//! # Static Dependency Table
//!
//! Read-only mapping from worker name to the workers that must have
//! completed, in some earlier group, before it may run. Built once from
//! configuration and shared between concurrent readers behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::config::default_dependencies;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl DependencyTable {
    /// An empty table: every worker is independent
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_map(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Add or replace one worker's dependency list
    pub fn with_dependencies<I, S>(mut self, worker: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            worker.into(),
            dependencies.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Dependencies of `worker`; unknown workers have none
    pub fn dependencies_of(&self, worker: &str) -> &[String] {
        self.entries.get(worker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True unless one worker lists the other as a dependency
    pub fn can_run_concurrently(&self, worker_a: &str, worker_b: &str) -> bool {
        let a_needs_b = self.dependencies_of(worker_a).iter().any(|d| d == worker_b);
        let b_needs_a = self.dependencies_of(worker_b).iter().any(|d| d == worker_a);
        !(a_needs_b || b_needs_a)
    }

    pub fn workers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, worker: &str) -> bool {
        self.entries.contains_key(worker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find one dependency cycle, returned as the worker path that closes it
    /// (first and last element are the same worker).
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            table: &'a DependencyTable,
            worker: &'a str,
            marks: &mut HashMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            match marks.get(worker) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = path.iter().position(|w| *w == worker).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|w| (*w).to_string()).collect();
                    cycle.push(worker.to_string());
                    return Some(cycle);
                }
                None => {}
            }

            marks.insert(worker, Mark::Visiting);
            path.push(worker);
            for dependency in table.dependencies_of(worker) {
                if let Some(cycle) = visit(table, dependency, marks, path) {
                    return Some(cycle);
                }
            }
            path.pop();
            marks.insert(worker, Mark::Done);
            None
        }

        let mut marks = HashMap::new();
        let mut path = Vec::new();
        self.entries
            .keys()
            .find_map(|worker| visit(self, worker, &mut marks, &mut path))
    }
}

impl Default for DependencyTable {
    fn default() -> Self {
        Self::from_map(default_dependencies())
    }
}
