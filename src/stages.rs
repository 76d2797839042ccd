//! Intermediate values of one inference run, for inspection and debugging.

use std::collections::BTreeMap;

use serde::Serialize;

/// What a single rule contributed to an inference run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleStage {
    /// Membership degree of each matched antecedent, keyed by variable name
    pub fuzzification: BTreeMap<String, f64>,
    /// Truth degree of the rule
    pub aggregation: f64,
    /// Consequent curve reshaped by the truth degree
    pub activation: Vec<f64>,
    /// Name of the output variable the rule targets
    pub consequent: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StageRecord {
    /// One entry per rule, in rule base order
    pub rules: Vec<RuleStage>,
    /// Combined curve of each output variable
    pub accumulation: BTreeMap<String, Vec<f64>>,
}

impl StageRecord {
    pub fn fuzzification(&self) -> impl Iterator<Item = &BTreeMap<String, f64>> {
        self.rules.iter().map(|rule| &rule.fuzzification)
    }

    pub fn aggregation(&self) -> impl Iterator<Item = f64> + '_ {
        self.rules.iter().map(|rule| rule.aggregation)
    }

    pub fn activation(&self) -> impl Iterator<Item = &[f64]> {
        self.rules.iter().map(|rule| rule.activation.as_slice())
    }

    pub fn accumulation(&self, var: &str) -> Option<&[f64]> {
        self.accumulation.get(var).map(Vec::as_slice)
    }
}
