//! Eligibility-driven task scheduler
//!
//! Tasks whose dependencies are all satisfied are spawned immediately and
//! concurrently; each completion re-evaluates the pending set. The first
//! failure stops new starts, but already-running tasks are drained rather
//! than abandoned, so their outcomes are always observed.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tokio::sync::mpsc;

use crate::logger;
use crate::orchestrator::graph::{TaskGraph, TaskInputs};
use crate::types::{SkaffError, SkaffResult};

/// Handle a task action uses to signal its single completion.
///
/// The handle is cheap to clone; signaling more than once (through clones or
/// otherwise) fails the run with [`SkaffError::DoubleCompletion`].
#[derive(Clone)]
pub struct Completion {
    name: String,
    tx: mpsc::UnboundedSender<TaskEvent>,
}

impl Completion {
    pub fn resolve(&self, value: Value) {
        self.send(Ok(value));
    }

    pub fn fail(&self, error: SkaffError) {
        self.send(Err(error));
    }

    fn send(&self, outcome: Result<Value, SkaffError>) {
        // The receiver is gone once the run has settled; a signal raced past
        // that point has nowhere to report to.
        let _ = self.tx.send(TaskEvent {
            name: self.name.clone(),
            outcome,
        });
    }
}

pub(crate) struct TaskEvent {
    name: String,
    outcome: Result<Value, SkaffError>,
}

/// Execute every task in the graph exactly once, respecting dependency
/// order, and settle with either the first failure or all task results.
pub async fn run(graph: TaskGraph) -> SkaffResult<HashMap<String, Value>> {
    graph.validate()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut pending = graph.into_entries();
    let mut completed: HashMap<String, Value> = HashMap::new();
    let mut in_flight: HashSet<String> = HashSet::new();
    let mut failure: Option<SkaffError> = None;

    start_eligible(&mut pending, &completed, &mut in_flight, &tx);

    while !in_flight.is_empty() {
        let event = match rx.recv().await {
            Some(event) => event,
            // A sender lives in this scope, so the channel cannot close
            // while tasks are in flight.
            None => break,
        };

        if !in_flight.remove(&event.name) {
            record_failure(&mut failure, SkaffError::DoubleCompletion(event.name));
            continue;
        }

        match event.outcome {
            Ok(value) => {
                logger::debug(format!("task '{}' completed", event.name));
                completed.insert(event.name, value);
                if failure.is_none() {
                    start_eligible(&mut pending, &completed, &mut in_flight, &tx);
                }
            }
            Err(error) => record_failure(&mut failure, error),
        }
    }

    // Signals already queued by settled tasks are still observable; any
    // event at this point is a second completion.
    while let Ok(event) = rx.try_recv() {
        record_failure(&mut failure, SkaffError::DoubleCompletion(event.name));
    }

    match failure {
        Some(error) => Err(error),
        None => Ok(completed),
    }
}

/// First failure wins; later ones are kept for diagnostics only.
fn record_failure(slot: &mut Option<SkaffError>, error: SkaffError) {
    if slot.is_none() {
        *slot = Some(error);
    } else {
        logger::warn(format!("further failure after the run already failed: {}", error));
    }
}

fn start_eligible(
    pending: &mut HashMap<String, super::graph::TaskEntry>,
    completed: &HashMap<String, Value>,
    in_flight: &mut HashSet<String>,
    tx: &mpsc::UnboundedSender<TaskEvent>,
) {
    let ready: Vec<String> = pending
        .iter()
        .filter(|(_, entry)| {
            entry
                .dependencies
                .iter()
                .all(|dep| completed.contains_key(dep))
        })
        .map(|(name, _)| name.clone())
        .collect();

    for name in ready {
        if let Some(entry) = pending.remove(&name) {
            let inputs: TaskInputs = entry
                .dependencies
                .iter()
                .filter_map(|dep| completed.get(dep).map(|value| (dep.clone(), value.clone())))
                .collect();
            let completion = Completion {
                name: name.clone(),
                tx: tx.clone(),
            };
            logger::debug(format!("starting task '{}'", name));
            in_flight.insert(name);
            tokio::spawn((entry.action)(inputs, completion));
        }
    }
}
