//! Task graph construction and validation
//!
//! Dependencies are declared as explicit name lists and checked up front:
//! every referenced name must exist and the relation must be acyclic. Nothing
//! here is inferred from signatures or injected at call time.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;
use serde_json::Value;

use crate::orchestrator::runner::Completion;
use crate::types::{SkaffError, SkaffResult};

/// Results of a task's declared dependencies, keyed by task name.
pub type TaskInputs = HashMap<String, Value>;

pub type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A task action: receives its dependency results and a completion handle it
/// must signal exactly once.
pub type TaskAction = Box<dyn FnOnce(TaskInputs, Completion) -> TaskFuture + Send>;

pub(crate) struct TaskEntry {
    pub(crate) dependencies: Vec<String>,
    pub(crate) action: TaskAction,
}

/// The full named-task-to-dependencies mapping for one orchestration run.
///
/// Task names are unique; registering a name twice replaces the earlier task.
pub struct TaskGraph {
    tasks: HashMap<String, TaskEntry>,
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGraph {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Register a task with its dependency names and action.
    pub fn task<F, Fut>(&mut self, name: &str, dependencies: &[&str], action: F)
    where
        F: FnOnce(TaskInputs, Completion) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tasks.insert(
            name.to_string(),
            TaskEntry {
                dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
                action: Box::new(move |inputs, completion| Box::pin(action(inputs, completion))),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The declared dependencies of a task, if it exists.
    pub fn dependencies_of(&self, name: &str) -> Option<&[String]> {
        self.tasks.get(name).map(|entry| entry.dependencies.as_slice())
    }

    /// Check the graph invariants: every dependency name resolves to a task,
    /// and no task (transitively) depends on itself.
    pub fn validate(&self) -> SkaffResult<()> {
        for (name, entry) in &self.tasks {
            for dependency in &entry.dependencies {
                if !self.tasks.contains_key(dependency) {
                    return Err(SkaffError::UnknownDependency {
                        task: name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let mut graph = DiGraph::<String, ()>::new();
        let mut node_indices = HashMap::new();
        for name in self.tasks.keys() {
            let node_index = graph.add_node(name.clone());
            node_indices.insert(name.clone(), node_index);
        }
        for (name, entry) in &self.tasks {
            let from_node = node_indices[name];
            for dependency in &entry.dependencies {
                graph.add_edge(from_node, node_indices[dependency], ());
            }
        }

        // Strongly connected components of size > 1 (or a self edge) are
        // cycles; report the first one sorted for a stable message.
        let mut cycles: Vec<Vec<String>> = kosaraju_scc(&graph)
            .into_iter()
            .filter_map(|component| {
                if component.len() > 1 {
                    let mut cycle = component
                        .iter()
                        .map(|node| graph[*node].clone())
                        .collect::<Vec<_>>();
                    cycle.sort();
                    Some(cycle)
                } else {
                    let node = component[0];
                    if graph.contains_edge(node, node) {
                        Some(vec![graph[node].clone()])
                    } else {
                        None
                    }
                }
            })
            .collect();
        cycles.sort();

        if let Some(cycle) = cycles.into_iter().next() {
            return Err(SkaffError::CyclicDependency(cycle));
        }

        Ok(())
    }

    pub(crate) fn into_entries(self) -> HashMap<String, TaskEntry> {
        self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(graph: &mut TaskGraph, name: &str, dependencies: &[&str]) {
        graph.task(name, dependencies, |_inputs, completion| async move {
            completion.resolve(Value::Null);
        });
    }

    #[test]
    fn valid_graph_passes_validation() {
        let mut graph = TaskGraph::new();
        noop(&mut graph, "a", &[]);
        noop(&mut graph, "b", &["a"]);
        assert!(graph.validate().is_ok());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn unknown_dependency_is_reported() {
        let mut graph = TaskGraph::new();
        noop(&mut graph, "a", &["ghost"]);
        match graph.validate() {
            Err(SkaffError::UnknownDependency { task, dependency }) => {
                assert_eq!(task, "a");
                assert_eq!(dependency, "ghost");
            }
            other => panic!("expected UnknownDependency, got {:?}", other.err()),
        }
    }

    #[test]
    fn two_task_cycle_is_reported_with_names() {
        let mut graph = TaskGraph::new();
        noop(&mut graph, "a", &["b"]);
        noop(&mut graph, "b", &["a"]);
        match graph.validate() {
            Err(SkaffError::CyclicDependency(names)) => {
                assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected CyclicDependency, got {:?}", other.err()),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut graph = TaskGraph::new();
        noop(&mut graph, "a", &["a"]);
        assert!(matches!(
            graph.validate(),
            Err(SkaffError::CyclicDependency(_))
        ));
    }

    #[test]
    fn dependencies_are_inspectable() {
        let mut graph = TaskGraph::new();
        noop(&mut graph, "a", &[]);
        noop(&mut graph, "b", &["a"]);
        assert_eq!(graph.dependencies_of("b"), Some(&["a".to_string()][..]));
        assert_eq!(graph.dependencies_of("missing"), None);
    }
}
