//! Agent Components
//!
//! A negotiating agent: business attributes, hypernorm and microsocial
//! weights, ethical state, and the log of past outcomes.

use isct_events::{Hypernorm, HypernormWeights, Verdict};
use serde::{Deserialize, Serialize};

use crate::error::NegotiationError;

/// Unique identifier for an agent within a run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        AgentId(id.to_string())
    }
}

/// The four business attributes used by weighted negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessAttribute {
    DataSharing,
    Regulation,
    ProfitFocus,
    Governance,
}

impl BusinessAttribute {
    pub const ALL: [BusinessAttribute; 4] = [
        BusinessAttribute::DataSharing,
        BusinessAttribute::Regulation,
        BusinessAttribute::ProfitFocus,
        BusinessAttribute::Governance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessAttribute::DataSharing => "data_sharing",
            BusinessAttribute::Regulation => "regulation",
            BusinessAttribute::ProfitFocus => "profit_focus",
            BusinessAttribute::Governance => "governance",
        }
    }
}

/// Business posture of an agent
/// All values are 0.0 to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusinessAttributes {
    pub data_sharing: f32,
    pub regulation: f32,
    pub profit_focus: f32,
    pub governance: f32,
}

impl Default for BusinessAttributes {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

impl BusinessAttributes {
    pub fn uniform(value: f32) -> Self {
        Self {
            data_sharing: value,
            regulation: value,
            profit_focus: value,
            governance: value,
        }
    }

    pub fn get(&self, attribute: BusinessAttribute) -> f32 {
        match attribute {
            BusinessAttribute::DataSharing => self.data_sharing,
            BusinessAttribute::Regulation => self.regulation,
            BusinessAttribute::ProfitFocus => self.profit_focus,
            BusinessAttribute::Governance => self.governance,
        }
    }

    pub fn set(&mut self, attribute: BusinessAttribute, value: f32) {
        match attribute {
            BusinessAttribute::DataSharing => self.data_sharing = value,
            BusinessAttribute::Regulation => self.regulation = value,
            BusinessAttribute::ProfitFocus => self.profit_focus = value,
            BusinessAttribute::Governance => self.governance = value,
        }
    }
}

/// One past negotiation as seen from this agent's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    pub round: u32,
    pub partner: AgentId,
    pub score: f32,
    pub verdict: Option<Verdict>,
}

/// A negotiating agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub attributes: BusinessAttributes,
    /// Universal priorities used by weighted negotiation
    pub hypernorms: HypernormWeights,
    /// Local contract weights compared by strict negotiation
    pub microsocial: HypernormWeights,
    /// Blend weight used by simple-average negotiation outside agreement
    pub microsocial_weight: f32,
    /// Ethical state / trust score
    pub ethical_state: f32,
    history: Vec<OutcomeEntry>,
}

impl Agent {
    /// Create an agent with neutral values (0.5 everywhere, hypernorm weights 1.0)
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: AgentId(id.into()),
            name: name.into(),
            attributes: BusinessAttributes::default(),
            hypernorms: HypernormWeights::default(),
            microsocial: HypernormWeights::uniform(0.5),
            microsocial_weight: 0.5,
            ethical_state: 0.5,
            history: Vec::new(),
        }
    }

    pub fn with_ethical_state(mut self, state: f32) -> Self {
        self.ethical_state = state;
        self
    }

    pub fn with_microsocial_weight(mut self, weight: f32) -> Self {
        self.microsocial_weight = weight;
        self
    }

    pub fn with_attributes(mut self, attributes: BusinessAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_hypernorms(mut self, weights: HypernormWeights) -> Self {
        self.hypernorms = weights;
        self
    }

    pub fn with_microsocial(mut self, weights: HypernormWeights) -> Self {
        self.microsocial = weights;
        self
    }

    /// Past outcomes, oldest first
    pub fn history(&self) -> &[OutcomeEntry] {
        &self.history
    }

    pub(crate) fn record(&mut self, entry: OutcomeEntry) {
        self.history.push(entry);
    }

    /// Mean score over the agent's history
    pub fn mean_score(&self) -> Option<f32> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.history.iter().map(|e| e.score).sum::<f32>() / self.history.len() as f32)
    }

    /// Names and values of every field outside 0.0 to 1.0
    pub fn out_of_range(&self) -> Vec<(String, f32)> {
        let mut fields = Vec::new();
        let mut check = |name: String, value: f32| {
            if !(0.0..=1.0).contains(&value) {
                fields.push((name, value));
            }
        };

        check("ethical_state".to_string(), self.ethical_state);
        check("microsocial_weight".to_string(), self.microsocial_weight);
        for attribute in BusinessAttribute::ALL {
            check(attribute.as_str().to_string(), self.attributes.get(attribute));
        }
        for hypernorm in Hypernorm::ALL {
            check(format!("hypernorms.{}", hypernorm), self.hypernorms.get(hypernorm));
            check(format!("microsocial.{}", hypernorm), self.microsocial.get(hypernorm));
        }
        fields
    }

    /// Reject the agent if any value lies outside 0.0 to 1.0
    pub fn validate(&self) -> Result<(), NegotiationError> {
        match self.out_of_range().first() {
            None => Ok(()),
            Some((field, value)) => Err(NegotiationError::invalid(format!(
                "agent {} has {} = {} outside [0, 1]",
                self.id, field, value
            ))),
        }
    }
}
