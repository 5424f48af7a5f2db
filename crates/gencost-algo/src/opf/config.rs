//! Compiler configuration

use gencost_core::{GencostResult, PowerUnit};
use serde::{Deserialize, Serialize};

use super::ObjectiveError;

/// Cost compiler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveConfig {
    /// Unit of the declared coefficients and segment bounds
    pub cost_unit: PowerUnit,
    /// Lower bound on the segment count used to size piecewise rows
    pub min_pwl_segments: usize,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            cost_unit: PowerUnit::Kw,
            min_pwl_segments: 2,
        }
    }
}

impl ObjectiveConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> GencostResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_cost_unit(mut self, unit: PowerUnit) -> Self {
        self.cost_unit = unit;
        self
    }

    pub fn with_min_pwl_segments(mut self, segments: usize) -> Self {
        self.min_pwl_segments = segments;
        self
    }

    /// Units of declaration per MW (1000 for kW declarations)
    pub fn per_mw(&self) -> f64 {
        self.cost_unit.per_megawatt()
    }

    pub fn validate(&self) -> Result<(), ObjectiveError> {
        // a two-point linear curve must fit into every piecewise row
        if self.min_pwl_segments == 0 {
            return Err(ObjectiveError::InvalidConfig(
                "min_pwl_segments must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
