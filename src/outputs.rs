use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};

/// Crisp value inferred for each output variable that at least one rule fired for
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Outputs(BTreeMap<String, f64>);

impl Outputs {
    pub(crate) fn new(defuzzificated: BTreeMap<String, f64>) -> Self {
        Self(defuzzificated)
    }

    pub fn get(&self, var: &str) -> Result<f64> {
        self.0
            .get(var)
            .copied()
            .ok_or_else(|| Error::OutputNotProduced(var.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, val)| (name.as_str(), *val))
    }
}
