use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use crate::config::OperatorConfig;
use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::rules::{Rule, Rules};
use crate::stages::{RuleStage, StageRecord};
use crate::variable::{Universe, VariableKey, Variables};

/// Mamdani inference over a fixed rule base.
///
/// The system is immutable once built, so one instance can serve concurrent
/// [`produce`](Self::produce) calls; every call returns its own [`Inference`].
pub struct FuzzySystem {
    variables: Variables,
    rules: Rules,
    ops: OperatorConfig,
}

impl FuzzySystem {
    /// Builds a system with the default `{min, min, max, centroid}` operators
    pub fn new(variables: Variables, rules: Rules) -> Result<Self> {
        Self::with_operators(variables, rules, OperatorConfig::default())
    }

    /// Every term in `rules` must be bound to a variable of `variables`; terms
    /// bound by another registry fail with [`Error::ForeignTerm`].
    pub fn with_operators(variables: Variables, rules: Rules, ops: OperatorConfig) -> Result<Self> {
        for rule in &rules {
            let terms = rule.antecedents().map(|(_, term)| term).chain(Some(rule.consequent()));

            for term in terms {
                variables.variable_name(term)?;
            }
        }

        Ok(Self { variables, rules, ops })
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn operators(&self) -> &OperatorConfig {
        &self.ops
    }

    /// Runs fuzzification, aggregation, activation, accumulation and
    /// defuzzification for one input snapshot. When `record_stages` is set the
    /// intermediate values are kept in the returned [`Inference`].
    pub fn produce(&self, inputs: &Inputs, record_stages: bool) -> Result<Inference> {
        if inputs.is_empty() {
            return Err(Error::MissingInput);
        }

        if let Some((name, _)) = inputs.iter().find(|(_, value)| !value.is_finite()) {
            return Err(Error::InvalidInput(name.to_owned()));
        }

        debug!(rules = self.rules.len(), inputs = inputs.len(), "producing");

        // Input values resolved to variable keys once, in input order
        let facts: Vec<(VariableKey, &str, f64)> = inputs
            .iter()
            .filter_map(|(name, value)| match self.variables.key(name) {
                Some(key) => Some((key, name, value)),
                None => {
                    trace!(input = name, "not a variable of the system, ignoring");
                    None
                },
            })
            .collect();

        let mut stages = record_stages.then(StageRecord::default);
        let mut accumulated: HashMap<VariableKey, (Universe, Vec<f64>)> = HashMap::new();

        for (i, rule) in self.rules.iter().enumerate() {
            let fuzzified = fuzzification(rule, &facts);
            let truth = self.aggregation(&fuzzified).ok_or(Error::EmptyAggregation { rule: i })?;
            let activated = self.activation(rule, truth);
            let consequent = rule.consequent();
            let var = consequent.variable()?;

            trace!(rule = i, ?fuzzified, truth, "rule fired");

            if let Some(stages) = &mut stages {
                stages.rules.push(RuleStage {
                    fuzzification: fuzzified.iter().map(|(name, m)| (name.to_string(), *m)).collect(),
                    aggregation: truth,
                    activation: activated.clone(),
                    consequent: self.variables[var].name().to_owned(),
                });
            }

            // Accumulation folds each activated curve into its variable's running curve
            match accumulated.get_mut(&var) {
                Some((universe, curve)) => {
                    debug_assert!(universe.ptr_eq(consequent.universe()));

                    for (acc, m) in curve.iter_mut().zip(activated) {
                        *acc = self.ops.accumulation.call(*acc, m);
                    }
                },
                None => {
                    accumulated.insert(var, (consequent.universe().clone(), activated));
                },
            }
        }

        let mut defuzzificated = BTreeMap::new();

        for (var, (universe, curve)) in accumulated {
            let name = self.variables[var].name();
            let crisp = self
                .ops
                .defuzzification
                .call(universe.as_slice(), &curve)
                .ok_or_else(|| Error::DegenerateReduction {
                    operator: self.ops.defuzzification.name(),
                    variable: name.to_owned(),
                })?;

            defuzzificated.insert(name.to_owned(), crisp);

            if let Some(stages) = &mut stages {
                stages.accumulation.insert(name.to_owned(), curve);
            }
        }

        debug!(outputs = ?defuzzificated, "produced");

        Ok(Inference {
            outputs: Outputs::new(defuzzificated),
            stages,
        })
    }

    /// Left fold of the antecedent degrees; `None` when the rule matched no input.
    fn aggregation(&self, fuzzified: &[(&str, f64)]) -> Option<f64> {
        fuzzified
            .iter()
            .map(|(_, m)| *m)
            .reduce(|acc, m| self.ops.aggregation.call(acc, m))
    }

    fn activation(&self, rule: &Rule, truth: f64) -> Vec<f64> {
        rule.consequent()
            .membership()
            .iter()
            .map(|&m| self.ops.activation.call(m, truth))
            .collect()
    }
}

/// Membership degree of every input the rule has an antecedent for
fn fuzzification<'f>(rule: &Rule, facts: &[(VariableKey, &'f str, f64)]) -> Vec<(&'f str, f64)> {
    facts
        .iter()
        .filter_map(|(key, name, value)| {
            rule.antecedent(*key)
                .map(|term| (*name, term.membership_value(*value)))
        })
        .collect()
}

/// Result of one [`FuzzySystem::produce`] call
#[derive(Clone, Debug)]
pub struct Inference {
    outputs: Outputs,
    stages: Option<StageRecord>,
}

impl Inference {
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Crisp value of output variable `var`
    pub fn output(&self, var: &str) -> Result<f64> {
        self.outputs.get(var)
    }

    pub fn stages(&self) -> Result<&StageRecord> {
        self.stages.as_ref().ok_or(Error::StagesNotRecorded)
    }

    pub fn into_outputs(self) -> Outputs {
        self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::{trapmf, trimf};
    use crate::ops::{BinaryOp, BinaryOperator, DefuzzificationOp, Defuzzifier};

    fn tipping_variables() -> Variables {
        let mut vars = Variables::new();
        let universe = Universe::with_step(0. ..=10., 1.).unwrap();

        for name in ["quality", "service"] {
            let var = vars.add(name, universe.clone()).unwrap();

            vars.set_term(var, "poor", trimf(universe.as_slice(), [0., 0., 5.])).unwrap();
            vars.set_term(var, "average", trimf(universe.as_slice(), [0., 5., 10.])).unwrap();
            vars.set_term(var, "good", trimf(universe.as_slice(), [5., 10., 10.])).unwrap();
        }

        let universe = Universe::with_step(0. ..=25., 1.).unwrap();
        let tip = vars.add("tip", universe.clone()).unwrap();

        vars.set_term(tip, "low", trimf(universe.as_slice(), [0., 0., 13.])).unwrap();
        vars.set_term(tip, "medium", trimf(universe.as_slice(), [0., 13., 25.])).unwrap();
        vars.set_term(tip, "high", trimf(universe.as_slice(), [13., 25., 25.])).unwrap();

        vars
    }

    fn tipping_rules(vars: &Variables) -> Rules {
        let term = |var, term| vars.term(var, term).unwrap().clone();
        let mut rules = Rules::with_capacity(3);

        rules.add([term("quality", "poor"), term("service", "poor")], term("tip", "low")).unwrap();
        rules.add([term("service", "average")], term("tip", "medium")).unwrap();
        rules.add([term("service", "good"), term("quality", "good")], term("tip", "high")).unwrap();
        rules
    }

    fn tipping(ops: OperatorConfig) -> FuzzySystem {
        let vars = tipping_variables();
        let rules = tipping_rules(&vars);

        FuzzySystem::with_operators(vars, rules, ops).unwrap()
    }

    fn basketball(ops: OperatorConfig) -> FuzzySystem {
        let mut vars = Variables::new();
        let height_u = Universe::with_step(170. ..=236., 1.).unwrap();
        let percent_u = Universe::with_step(0. ..=100., 1.).unwrap();
        let height = vars.add("height", height_u.clone()).unwrap();
        let skill = vars.add("skill", percent_u.clone()).unwrap();
        let confidence = vars.add("confidence", percent_u.clone()).unwrap();

        let height_terms = [
            ("very_tall", [217., 222., 236., 236.]),
            ("tall", [203., 206., 217., 222.]),
            ("average", [189., 194., 204., 209.]),
            ("short", [170., 170., 189., 194.]),
        ];
        let skill_terms = [
            ("excellent", [85., 90., 100., 100.]),
            ("very_good", [60., 65., 85., 90.]),
            ("good", [45., 50., 65., 70.]),
            ("average", [25., 30., 45., 50.]),
            ("poor", [10., 15., 30., 35.]),
        ];
        let confidence_terms = [
            ("full", [80., 85., 100., 100.]),
            ("average", [60., 65., 80., 85.]),
            ("low", [35., 40., 60., 65.]),
            ("no", [0., 0., 35., 40.]),
        ];

        for (name, abcd) in height_terms {
            vars.set_term(height, name, trapmf(height_u.as_slice(), abcd)).unwrap();
        }
        for (name, abcd) in skill_terms {
            vars.set_term(skill, name, trapmf(percent_u.as_slice(), abcd)).unwrap();
        }
        for (name, abcd) in confidence_terms {
            vars.set_term(confidence, name, trapmf(percent_u.as_slice(), abcd)).unwrap();
        }

        // Confidence for each skill, by height from very tall down to short
        let table = [
            ("excellent", ["full", "full", "average", "average"]),
            ("very_good", ["full", "full", "average", "average"]),
            ("good", ["full", "full", "average", "low"]),
            ("average", ["average", "average", "low", "no"]),
            ("poor", ["average", "average", "low", "no"]),
        ];
        let term = |var, term| vars.term(var, term).unwrap().clone();
        let mut rules = Rules::with_capacity(20);

        for (skill, row) in table {
            for (&(height, _), confidence) in height_terms.iter().zip(row) {
                let rule = term("skill", skill)
                    .and(term("height", height))
                    .then(term("confidence", confidence))
                    .unwrap();

                rules.push(rule);
            }
        }

        FuzzySystem::with_operators(vars, rules, ops).unwrap()
    }

    fn tipping_inputs() -> Inputs {
        Inputs::from([("quality", 6.5), ("service", 9.8)])
    }

    #[test]
    fn test_tipping() {
        let system = tipping(OperatorConfig::default());
        let tip = system.produce(&tipping_inputs(), false).unwrap().output("tip").unwrap();
        let tip_u = system.variables().by_name("tip").unwrap().universe().clone();
        let centroid = |term| {
            let term = system.variables().term("tip", term).unwrap();

            DefuzzificationOp::Centroid.call(tip_u.as_slice(), term.membership()).unwrap()
        };

        assert!((tip - 18.281362007168468).abs() < 1e-9);
        assert!(centroid("medium") < tip && tip < centroid("high"));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let system = tipping(OperatorConfig::default());
        let first = system.produce(&tipping_inputs(), false).unwrap().output("tip").unwrap();
        let second = system.produce(&tipping_inputs(), false).unwrap().output("tip").unwrap();

        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_basketball() {
        let inputs = Inputs::from([("height", 190.), ("skill", 54.)]);
        let system = basketball(OperatorConfig::default().with_defuzzification(DefuzzificationOp::Mom));
        let inference = system.produce(&inputs, true).unwrap();

        assert_eq!(inference.output("confidence"), Ok(50.));
        assert_eq!(inference.outputs().len(), 1);
        assert_eq!(inference.stages().unwrap().rules.len(), 20);

        let system = basketball(OperatorConfig::default());
        let confidence = system.produce(&inputs, false).unwrap().output("confidence").unwrap();

        assert!((confidence - 53.95161290322582).abs() < 1e-9);
    }

    #[test]
    fn test_stages() {
        let system = tipping(OperatorConfig::default());
        let inference = system.produce(&tipping_inputs(), true).unwrap();
        let stages = inference.stages().unwrap();
        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;

        let fuzzification: Vec<_> = stages.fuzzification().collect();

        assert_eq!(fuzzification[0]["quality"], 0.);
        assert_eq!(fuzzification[0]["service"], 0.);
        assert_eq!(fuzzification[1].len(), 1);
        assert!(close(fuzzification[1]["service"], 0.04));
        assert!(close(fuzzification[2]["quality"], 0.3));
        assert!(close(fuzzification[2]["service"], 0.96));

        let aggregation: Vec<_> = stages.aggregation().collect();

        assert_eq!(aggregation[0], 0.);
        assert!(close(aggregation[1], 0.04));
        assert!(close(aggregation[2], 0.3));

        let activation: Vec<_> = stages.activation().collect();

        assert!(activation[0].iter().all(|m| *m == 0.));
        assert!(activation[2].iter().all(|m| *m <= aggregation[2]));
        assert!(stages.rules.iter().all(|rule| rule.consequent == "tip"));

        let tip = stages.accumulation("tip").unwrap();

        assert_eq!(tip.len(), 26);
        assert_eq!(tip[0], 0.);
        assert!(close(tip[5], 0.04));
        assert!(close(tip[25], 0.3));
        assert!(stages.accumulation("quality").is_none());

        let json = serde_json::to_value(stages).unwrap();

        assert_eq!(json["rules"].as_array().unwrap().len(), 3);
        assert_eq!(json["accumulation"]["tip"].as_array().unwrap().len(), 26);
    }

    #[test]
    fn test_stages_not_recorded() {
        let system = tipping(OperatorConfig::default());
        let inference = system.produce(&tipping_inputs(), false).unwrap();

        assert_eq!(inference.stages().unwrap_err(), Error::StagesNotRecorded);
        assert_eq!(
            inference.output("quality").unwrap_err(),
            Error::OutputNotProduced("quality".into())
        );
    }

    #[test]
    fn test_missing_input() {
        let system = tipping(OperatorConfig::default());

        assert_eq!(system.produce(&Inputs::new(), false).unwrap_err(), Error::MissingInput);
    }

    #[test]
    fn test_non_finite_input() {
        let system = tipping(OperatorConfig::default());

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let inputs = Inputs::from([("quality", value), ("service", 5.)]);

            assert_eq!(
                system.produce(&inputs, false).unwrap_err(),
                Error::InvalidInput("quality".into())
            );
        }

        // Checked before unknown names are dropped
        let inputs = Inputs::from([("service", 5.), ("weather", f64::NAN)]);

        assert_eq!(
            system.produce(&inputs, false).unwrap_err(),
            Error::InvalidInput("weather".into())
        );
    }

    #[test]
    fn test_empty_aggregation() {
        let system = tipping(OperatorConfig::default());
        let inputs = Inputs::from([("quality", 6.5)]);

        assert_eq!(
            system.produce(&inputs, false).unwrap_err(),
            Error::EmptyAggregation { rule: 1 }
        );
    }

    #[test]
    fn test_unknown_inputs_are_ignored() {
        let system = tipping(OperatorConfig::default());
        let with_extra = tipping_inputs().with("weather", 3.);

        assert_eq!(
            system.produce(&with_extra, false).unwrap().outputs(),
            system.produce(&tipping_inputs(), false).unwrap().outputs()
        );
    }

    #[test]
    fn test_out_of_domain_inputs_clamp() {
        let system = tipping(OperatorConfig::default());
        let above = Inputs::from([("quality", 14.), ("service", 9.8)]);
        let edge = Inputs::from([("quality", 10.), ("service", 9.8)]);

        assert_eq!(
            system.produce(&above, false).unwrap().output("tip"),
            system.produce(&edge, false).unwrap().output("tip")
        );
    }

    #[test]
    fn test_degenerate_reduction() {
        let system = tipping(OperatorConfig::default());
        // Every rule has a truth degree of zero here
        let inputs = Inputs::from([("quality", 0.), ("service", 10.)]);

        assert_eq!(
            system.produce(&inputs, false).unwrap_err(),
            Error::DegenerateReduction {
                operator: "centroid",
                variable: "tip".into()
            }
        );

        let system = tipping(OperatorConfig::default().with_defuzzification(Defuzzifier::custom(|_, _| 0.)));

        assert_eq!(system.produce(&inputs, false).unwrap().output("tip"), Ok(0.));
    }

    #[test]
    fn test_single_antecedent_aggregation_identity() {
        for op in BinaryOp::ALL {
            let system = tipping(OperatorConfig::default().with_aggregation(op));
            let inference = system.produce(&tipping_inputs(), true).unwrap();
            let rule = &inference.stages().unwrap().rules[1];

            assert_eq!(rule.aggregation, rule.fuzzification["service"], "{}", op.name());
        }
    }

    #[test]
    fn test_single_rule_accumulation_identity() {
        for op in BinaryOp::ALL {
            let vars = tipping_variables();
            let rule = vars
                .term("service", "good")
                .unwrap()
                .clone()
                .then(vars.term("tip", "high").unwrap().clone())
                .unwrap();
            let ops = OperatorConfig::default().with_accumulation(op);
            let system = FuzzySystem::with_operators(vars, Rules::from_iter([rule]), ops).unwrap();
            let inference = system.produce(&tipping_inputs(), true).unwrap();
            let stages = inference.stages().unwrap();

            assert_eq!(stages.accumulation("tip").unwrap(), stages.rules[0].activation, "{}", op.name());
        }
    }

    #[test]
    fn test_custom_operators() {
        let builtin = tipping(OperatorConfig::default().with_activation(BinaryOp::Prod));
        let custom = tipping(OperatorConfig::default().with_activation(BinaryOperator::custom(|x, y| x * y)));

        assert_eq!(
            builtin.produce(&tipping_inputs(), false).unwrap().outputs(),
            custom.produce(&tipping_inputs(), false).unwrap().outputs()
        );

        let first_sample = tipping(
            OperatorConfig::default().with_defuzzification(Defuzzifier::custom(|u, _| u[0])),
        );

        assert_eq!(first_sample.produce(&tipping_inputs(), false).unwrap().output("tip"), Ok(0.));
    }

    #[test]
    fn test_rules_from_another_registry_are_rejected() {
        let vars = tipping_variables();
        let rules = tipping_rules(&vars);

        assert_eq!(FuzzySystem::new(Variables::new(), rules).err(), Some(Error::ForeignTerm));

        // A registry whose keys line up with the one the rules were bound in
        let mut other = Variables::new();
        let universe = Universe::with_step(0. ..=10., 1.).unwrap();
        let temperature = other.add("temperature", universe.clone()).unwrap();
        let fan = other.add("fan", universe.clone()).unwrap();

        other.set_term(temperature, "hot", trimf(universe.as_slice(), [5., 10., 10.])).unwrap();
        other.set_term(fan, "fast", trimf(universe.as_slice(), [5., 10., 10.])).unwrap();

        assert_eq!(other.key("temperature"), vars.key("quality"));
        assert_eq!(
            FuzzySystem::new(other, tipping_rules(&vars)).err(),
            Some(Error::ForeignTerm)
        );

        // Even a registry built identically is a different registry
        assert_eq!(
            FuzzySystem::new(tipping_variables(), tipping_rules(&vars)).err(),
            Some(Error::ForeignTerm)
        );
    }

    #[test]
    fn test_concurrent_produce() {
        let system = tipping(OperatorConfig::default());
        let inputs: Vec<Inputs> = (0..8)
            .map(|i| Inputs::from([("quality", i as f64), ("service", 9.8 - i as f64 / 10.)]))
            .collect();
        let sequential: Vec<_> = inputs
            .iter()
            .map(|inputs| system.produce(inputs, true).unwrap().into_outputs())
            .collect();

        let system = &system;
        let concurrent: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|inputs| s.spawn(move || system.produce(inputs, true).unwrap().into_outputs()))
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, concurrent);
    }
}
