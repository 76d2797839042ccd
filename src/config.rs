use serde::Deserialize;

use crate::error::Result;
use crate::ops::{BinaryOp, BinaryOperator, DefuzzificationOp, Defuzzifier};

/// Operators used by each stage of the inference pipeline.
///
/// Any slot left out when deserializing falls back to the default
/// `{min, min, max, centroid}` configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperatorConfig {
    /// Combines the antecedent degrees of a rule into its truth degree
    pub aggregation: BinaryOperator,
    /// Reshapes each consequent sample by the rule's truth degree.
    /// Called as `activation(sample, truth)`.
    pub activation: BinaryOperator,
    /// Merges the activated curves targeting the same output variable
    pub accumulation: BinaryOperator,
    pub defuzzification: Defuzzifier,
}

impl OperatorConfig {
    /// Resolves every slot through the operator registry
    pub fn from_names(aggregation: &str, activation: &str, accumulation: &str, defuzzification: &str) -> Result<Self> {
        Ok(Self {
            aggregation: BinaryOperator::from_name(aggregation)?,
            activation: BinaryOperator::from_name(activation)?,
            accumulation: BinaryOperator::from_name(accumulation)?,
            defuzzification: Defuzzifier::from_name(defuzzification)?,
        })
    }

    pub fn with_aggregation(mut self, op: impl Into<BinaryOperator>) -> Self {
        self.aggregation = op.into();
        self
    }

    pub fn with_activation(mut self, op: impl Into<BinaryOperator>) -> Self {
        self.activation = op.into();
        self
    }

    pub fn with_accumulation(mut self, op: impl Into<BinaryOperator>) -> Self {
        self.accumulation = op.into();
        self
    }

    pub fn with_defuzzification(mut self, op: impl Into<Defuzzifier>) -> Self {
        self.defuzzification = op.into();
        self
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            aggregation: BinaryOp::Min.into(),
            activation: BinaryOp::Min.into(),
            accumulation: BinaryOp::Max.into(),
            defuzzification: DefuzzificationOp::Centroid.into(),
        }
    }
}
