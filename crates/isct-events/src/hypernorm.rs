//! Hypernorm Vocabulary
//!
//! The fixed set of universal ethical priorities and per-agent weights keyed by them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A universal ethical priority applied uniformly in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hypernorm {
    Fairness,
    Transparency,
    Privacy,
    Accountability,
    CulturalRespect,
}

impl Hypernorm {
    /// All hypernorms in their canonical order.
    ///
    /// Strict negotiation walks this list front to back, so the order decides
    /// which violation is reported when several thresholds are exceeded.
    pub const ALL: [Hypernorm; 5] = [
        Hypernorm::Fairness,
        Hypernorm::Transparency,
        Hypernorm::Privacy,
        Hypernorm::Accountability,
        Hypernorm::CulturalRespect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hypernorm::Fairness => "fairness",
            Hypernorm::Transparency => "transparency",
            Hypernorm::Privacy => "privacy",
            Hypernorm::Accountability => "accountability",
            Hypernorm::CulturalRespect => "cultural_respect",
        }
    }
}

impl fmt::Display for Hypernorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no hypernorm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHypernormError(pub String);

impl fmt::Display for ParseHypernormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hypernorm: {}", self.0)
    }
}

impl std::error::Error for ParseHypernormError {}

impl FromStr for Hypernorm {
    type Err = ParseHypernormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hypernorm::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| ParseHypernormError(s.to_string()))
    }
}

/// One weight per hypernorm.
/// Values are expected in 0.0 to 1.0 but are not clamped here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HypernormWeights {
    pub fairness: f32,
    pub transparency: f32,
    pub privacy: f32,
    pub accountability: f32,
    pub cultural_respect: f32,
}

impl Default for HypernormWeights {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl HypernormWeights {
    /// Same weight for every hypernorm
    pub fn uniform(weight: f32) -> Self {
        Self {
            fairness: weight,
            transparency: weight,
            privacy: weight,
            accountability: weight,
            cultural_respect: weight,
        }
    }

    pub fn get(&self, hypernorm: Hypernorm) -> f32 {
        match hypernorm {
            Hypernorm::Fairness => self.fairness,
            Hypernorm::Transparency => self.transparency,
            Hypernorm::Privacy => self.privacy,
            Hypernorm::Accountability => self.accountability,
            Hypernorm::CulturalRespect => self.cultural_respect,
        }
    }

    pub fn set(&mut self, hypernorm: Hypernorm, weight: f32) {
        match hypernorm {
            Hypernorm::Fairness => self.fairness = weight,
            Hypernorm::Transparency => self.transparency = weight,
            Hypernorm::Privacy => self.privacy = weight,
            Hypernorm::Accountability => self.accountability = weight,
            Hypernorm::CulturalRespect => self.cultural_respect = weight,
        }
    }

    pub fn with(mut self, hypernorm: Hypernorm, weight: f32) -> Self {
        self.set(hypernorm, weight);
        self
    }

    /// Iterate weights in canonical hypernorm order
    pub fn iter(&self) -> impl Iterator<Item = (Hypernorm, f32)> + '_ {
        Hypernorm::ALL.into_iter().map(move |h| (h, self.get(h)))
    }
}
