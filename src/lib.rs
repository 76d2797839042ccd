//! Mamdani-style fuzzy inference.
//!
//! Linguistic [`Variable`]s own a sampled [`Universe`] and a set of named
//! [`Term`]s. [`Rule`]s join antecedent terms to a consequent term, and a
//! [`FuzzySystem`] turns crisp [`Inputs`] into crisp [`Outputs`] by running
//! fuzzification, aggregation, activation, accumulation and defuzzification
//! with the operators of its [`OperatorConfig`].
//!
//! ```
//! use mamdani::{trimf, FuzzySystem, Inputs, OperatorConfig, Rules, Universe, Variables};
//!
//! let mut vars = Variables::new();
//! let universe = Universe::with_step(0. ..=10., 1.)?;
//! let service = vars.add("service", universe.clone())?;
//! let tip = vars.add("tip", universe.clone())?;
//!
//! let poor = vars.set_term(service, "poor", trimf(universe.as_slice(), [0., 0., 5.]))?;
//! let good = vars.set_term(service, "good", trimf(universe.as_slice(), [5., 10., 10.]))?;
//! let low = vars.set_term(tip, "low", trimf(universe.as_slice(), [0., 0., 5.]))?;
//! let high = vars.set_term(tip, "high", trimf(universe.as_slice(), [5., 10., 10.]))?;
//!
//! let mut rules = Rules::new();
//! rules.push(poor.then(low)?);
//! rules.push(good.then(high)?);
//!
//! let system = FuzzySystem::with_operators(vars, rules, OperatorConfig::from_names("min", "prod", "max", "mom")?)?;
//! let inference = system.produce(&Inputs::from([("service", 8.)]), false)?;
//!
//! assert_eq!(inference.output("tip")?, 10.);
//! # Ok::<(), mamdani::Error>(())
//! ```

mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod stages;
mod variable;

pub use config::OperatorConfig;
pub use dsl::Premise;
pub use error::{Error, Result};
pub use inference::{FuzzySystem, Inference};
pub use inputs::Inputs;
pub use membership::{trapmf, trimf};
pub use ops::{BinaryFn, BinaryOp, BinaryOperator, DefuzzificationOp, Defuzzifier, DefuzzifyFn};
pub use outputs::Outputs;
pub use rules::{Rule, Rules};
pub use stages::{RuleStage, StageRecord};
pub use variable::{Term, Universe, Variable, VariableKey, Variables};
