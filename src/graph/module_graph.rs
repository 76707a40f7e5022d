// src/graph/module_graph.rs

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use tracing::warn;

use crate::fs::{normalize_separators, relative_str};
use crate::types::Module;

/// Project-dependency graph of the reported modules.
///
/// Edge direction: dependency -> dependent. For
/// `"core","...","app"` we add `core -> app`.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
    /// `(project-relative dir, module name)`, longest dir first.
    locations: Vec<(String, String)>,
}

impl ModuleGraph {
    /// Build the graph. Module paths are made relative to `project_dir`.
    pub fn from_modules(project_dir: &Path, modules: &[Module]) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for module in modules {
            index
                .entry(module.name.clone())
                .or_insert_with(|| graph.add_node(module.name.clone()));
        }

        for module in modules {
            let from = index[&module.name];
            for dependent in module.declared_dependents() {
                let to = match index.get(dependent) {
                    Some(&to) => to,
                    None => {
                        warn!(
                            module = %module.name,
                            dependent,
                            "report names a dependent that is not a reported module"
                        );
                        let to = graph.add_node(dependent.to_string());
                        index.insert(dependent.to_string(), to);
                        to
                    }
                };
                graph.update_edge(from, to, ());
            }
        }

        let mut locations: Vec<(String, String)> = modules
            .iter()
            .filter_map(|m| {
                module_dir(project_dir, &m.path).map(|dir| (dir, m.name.clone()))
            })
            .collect();
        locations.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.1.cmp(&b.1)));

        Self {
            graph,
            index,
            locations,
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct dependents of `name`, sorted.
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        let Some(&node) = self.index.get(name) else {
            return Vec::new();
        };
        let mut out: Vec<String> = self
            .graph
            .neighbors(node)
            .map(|n| self.graph[n].clone())
            .collect();
        out.sort();
        out
    }

    /// Module owning a repository-relative file path, if any.
    ///
    /// The module whose directory is the longest component-wise prefix of
    /// the path wins, so nested modules shadow their parents.
    pub fn owner_of(&self, file: &str) -> Option<&str> {
        let file = normalize_separators(file);
        self.locations
            .iter()
            .find(|(dir, _)| is_within(&file, dir))
            .map(|(_, name)| name.as_str())
    }

    /// Split changed files into owning module names and unowned files.
    pub fn owners<'a>(&self, files: &'a [String]) -> (BTreeSet<String>, Vec<&'a String>) {
        let mut owned = BTreeSet::new();
        let mut unowned = Vec::new();
        for file in files {
            match self.owner_of(file) {
                Some(name) => {
                    owned.insert(name.to_string());
                }
                None => unowned.push(file),
            }
        }
        (owned, unowned)
    }

    /// `changed` modules plus all their transitive dependents, in build order.
    ///
    /// Falls back to name order if the graph has a cycle.
    pub fn affected_by<'a, I>(&self, changed: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut reached = BTreeSet::new();
        for name in changed {
            let Some(&start) = self.index.get(name) else {
                continue;
            };
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(node) = bfs.next(&self.graph) {
                reached.insert(node);
            }
        }

        match toposort(&self.graph, None) {
            Ok(order) => order
                .into_iter()
                .filter(|n| reached.contains(n))
                .map(|n| self.graph[n].clone())
                .collect(),
            Err(cycle) => {
                warn!(
                    module = %self.graph[cycle.node_id()],
                    "module graph has a cycle; affected modules listed by name"
                );
                let mut names: Vec<String> =
                    reached.into_iter().map(|n| self.graph[n].clone()).collect();
                names.sort();
                names
            }
        }
    }
}

/// Project-relative directory of a module as reported by Gradle.
///
/// Gradle reports absolute `projectDir` paths; relative ones are accepted
/// too. Modules outside the project dir (included builds) own nothing.
fn module_dir(project_dir: &Path, reported: &str) -> Option<String> {
    let path = Path::new(reported);
    if path.is_absolute() {
        relative_str(project_dir, path)
    } else {
        Some(normalize_separators(reported))
    }
}

fn is_within(file: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return true;
    }
    file.strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, path: &str, dependents: &[&str]) -> Module {
        let dependents = if dependents.is_empty() {
            vec![String::new()]
        } else {
            dependents.iter().map(|s| s.to_string()).collect()
        };
        Module {
            name: name.into(),
            path: path.into(),
            dependents,
        }
    }

    fn sample() -> ModuleGraph {
        // core <- lib <- app, core <- cli
        ModuleGraph::from_modules(
            Path::new("/repo"),
            &[
                module("core", "/repo/core", &["lib", "cli"]),
                module("lib", "/repo/libs/lib", &["app"]),
                module("app", "/repo/app", &[]),
                module("cli", "./tools/cli", &[]),
            ],
        )
    }

    #[test]
    fn empty_dependents_add_no_edges() {
        let graph = sample();
        assert_eq!(graph.len(), 4);
        assert!(graph.dependents_of("app").is_empty());
        assert_eq!(graph.dependents_of("core"), vec!["cli", "lib"]);
    }

    #[test]
    fn owner_is_longest_prefix() {
        let graph = ModuleGraph::from_modules(
            Path::new("/repo"),
            &[
                module("parent", "/repo/libs", &[]),
                module("child", "/repo/libs/child", &[]),
            ],
        );
        assert_eq!(graph.owner_of("libs/child/src/A.kt"), Some("child"));
        assert_eq!(graph.owner_of("libs/other/B.kt"), Some("parent"));
        assert_eq!(graph.owner_of("libsx/C.kt"), None);
        assert_eq!(graph.owner_of("settings.gradle"), None);
    }

    #[test]
    fn change_in_core_affects_everything_downstream_in_order() {
        let graph = sample();
        let affected = graph.affected_by(["core"]);
        assert_eq!(affected.len(), 4);
        let pos = |n: &str| affected.iter().position(|a| a == n).unwrap();
        assert!(pos("core") < pos("lib"));
        assert!(pos("lib") < pos("app"));
        assert!(pos("core") < pos("cli"));
    }

    #[test]
    fn change_in_leaf_affects_only_leaf() {
        let graph = sample();
        assert_eq!(graph.affected_by(["app"]), vec!["app"]);
        assert!(graph.affected_by(["unknown"]).is_empty());
    }

    #[test]
    fn owners_split_unowned_files() {
        let graph = sample();
        let files = vec![
            "core/src/Core.kt".to_string(),
            "tools/cli/Main.kt".to_string(),
            "README.md".to_string(),
        ];
        let (owned, unowned) = graph.owners(&files);
        assert_eq!(owned.into_iter().collect::<Vec<_>>(), vec!["cli", "core"]);
        assert_eq!(unowned, vec![&files[2]]);
    }

    #[test]
    fn cycle_falls_back_to_name_order() {
        let graph = ModuleGraph::from_modules(
            Path::new("/repo"),
            &[module("a", "/repo/a", &["b"]), module("b", "/repo/b", &["a"])],
        );
        assert_eq!(graph.affected_by(["a"]), vec!["a", "b"]);
    }
}
