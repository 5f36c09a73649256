use super::State;
use crate::render::{Block, RichOutput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything an evaluation produces. Set once, then read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub state: State,
    pub description: String,
    pub rich: RichOutput,
    /// Computed statistics by name (`p_value`, `r`, `null_rate`, ...).
    pub metrics: BTreeMap<String, f64>,
}

impl Outcome {
    fn with_state(state: State, description: impl Into<String>) -> Self {
        Self {
            state,
            description: description.into(),
            rich: RichOutput::new(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn qualified(description: impl Into<String>) -> Self {
        Self::with_state(State::Qualified, description)
    }

    pub fn unqualified(description: impl Into<String>) -> Self {
        Self::with_state(State::Unqualified, description)
    }

    pub fn invalid(description: impl Into<String>) -> Self {
        Self::with_state(State::Invalid, description)
    }

    /// Record a statistic. Non-finite values are dropped so the outcome stays
    /// serializable.
    #[must_use]
    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        if value.is_finite() {
            self.metrics.insert(name.to_owned(), value);
        }
        self
    }

    #[must_use]
    pub fn with_rich(mut self, rich: RichOutput) -> Self {
        self.rich = rich;
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: Block) -> Self {
        self.rich.push(block);
        self
    }
}
