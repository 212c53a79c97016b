//! Population
//!
//! The agent set owned by one simulation run.

use crate::components::agent::{Agent, AgentId};
use crate::error::NegotiationError;

/// Agents of one run, in insertion order
#[derive(Debug, Clone, Default)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a population, admitting each agent in order
    pub fn from_agents(
        agents: impl IntoIterator<Item = Agent>,
        strict: bool,
    ) -> Result<Self, NegotiationError> {
        let mut population = Self::new();
        for agent in agents {
            population.insert(agent, strict)?;
        }
        Ok(population)
    }

    /// Admit an agent.
    ///
    /// With `strict` set, values outside 0.0 to 1.0 are rejected. Otherwise
    /// they are admitted as-is and logged.
    pub fn insert(&mut self, agent: Agent, strict: bool) -> Result<(), NegotiationError> {
        if self.index_of(&agent.id).is_some() {
            return Err(NegotiationError::invalid(format!(
                "duplicate agent id {}",
                agent.id
            )));
        }

        if strict {
            agent.validate()?;
        } else {
            for (field, value) in agent.out_of_range() {
                tracing::warn!(agent = %agent.id, field = %field, value, "admitting out-of-range value");
            }
        }

        self.agents.push(agent);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn index_of(&self, id: &AgentId) -> Option<usize> {
        self.agents.iter().position(|a| &a.id == id)
    }

    /// Pairwise negotiation needs at least two agents
    pub fn ensure_pairable(&self) -> Result<(), NegotiationError> {
        if self.agents.len() < 2 {
            return Err(NegotiationError::invalid(format!(
                "pairwise negotiation needs at least 2 agents, population has {}",
                self.agents.len()
            )));
        }
        Ok(())
    }

    /// Borrow two distinct agents mutably
    pub fn pair_mut(
        &mut self,
        first: usize,
        second: usize,
    ) -> Result<(&mut Agent, &mut Agent), NegotiationError> {
        if first == second {
            return Err(NegotiationError::invalid(format!(
                "agent at slot {} cannot negotiate with itself",
                first
            )));
        }
        let len = self.agents.len();
        if first >= len || second >= len {
            return Err(NegotiationError::invalid(format!(
                "slots ({}, {}) out of bounds for population of {}",
                first, second, len
            )));
        }

        if first < second {
            let (left, right) = self.agents.split_at_mut(second);
            Ok((&mut left[first], &mut right[0]))
        } else {
            let (left, right) = self.agents.split_at_mut(first);
            Ok((&mut right[0], &mut left[second]))
        }
    }

    pub fn ethical_states(&self) -> Vec<f32> {
        self.agents.iter().map(|a| a.ethical_state).collect()
    }
}
