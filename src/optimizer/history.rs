//! Per-generation record of the run.

use crate::agent::Agent;

/// Normalized coordinates and fitness of one evaluated agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentRecord {
    pub coordinates: Vec<f64>,
    pub fitness: f64,
}

impl AgentRecord {
    /// Snapshot of `agent`, or `None` if it has not been evaluated.
    pub fn of<A: Agent>(agent: &A) -> Option<Self> {
        agent.fitness().map(|fitness| Self {
            coordinates: agent.coordinates().to_vec(),
            fitness,
        })
    }
}

/// Best agent and full population per generation.
///
/// Slot 0 of the best-agent series holds the first agent evaluated in the
/// run (the caller's existing design when one was given), so the caller
/// can compare every later generation against the baseline. Slot `g + 1`
/// holds the fittest agent after generation `g` completed. Population
/// slot `g` holds evaluated generation `g`. Both series have
/// `max_generations + 1` slots; writes beyond that are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History {
    best: Vec<Option<AgentRecord>>,
    populations: Vec<Option<Vec<AgentRecord>>>,
}

impl History {
    pub fn new(max_generations: usize) -> Self {
        Self {
            best: vec![None; max_generations + 1],
            populations: vec![None; max_generations + 1],
        }
    }

    /// Number of slots in each series.
    pub fn capacity(&self) -> usize {
        self.best.len()
    }

    pub fn clear(&mut self) {
        self.best.iter_mut().for_each(|slot| *slot = None);
        self.populations.iter_mut().for_each(|slot| *slot = None);
    }

    pub(crate) fn record_best(&mut self, slot: usize, record: AgentRecord) {
        if let Some(entry) = self.best.get_mut(slot) {
            *entry = Some(record);
        }
    }

    pub(crate) fn record_population(&mut self, slot: usize, records: Vec<AgentRecord>) {
        if let Some(entry) = self.populations.get_mut(slot) {
            *entry = Some(records);
        }
    }

    /// Best agent stored in `slot`, if that slot has been written.
    pub fn best(&self, slot: usize) -> Option<&AgentRecord> {
        self.best.get(slot).and_then(Option::as_ref)
    }

    /// Population of generation `slot`, if it has been evaluated.
    pub fn population(&self, slot: usize) -> Option<&[AgentRecord]> {
        self.populations.get(slot).and_then(|p| p.as_deref())
    }

    /// Written best-agent slots, in order.
    pub fn best_records(&self) -> impl Iterator<Item = &AgentRecord> {
        self.best.iter().flatten()
    }

    /// Fitness of every written best-agent slot, in order.
    pub fn best_fitness_series(&self) -> Vec<f64> {
        self.best_records().map(|r| r.fitness).collect()
    }
}
