use std::collections::HashMap;
use std::ops::{Index, RangeInclusive};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use crate::error::{Error, Result};
use crate::linspace::Linspace;
use crate::math::interp_membership;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

/// Identity of a [`Variables`] registry, unique within the process
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RegistryId(u64);

impl RegistryId {
    fn next() -> Self {
        Self(NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Strictly increasing sample points a variable's terms are defined over.
/// Cloning shares the underlying samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe(Arc<[f64]>);

impl Universe {
    pub fn new(points: impl Into<Vec<f64>>) -> Result<Self> {
        let points = points.into();

        if points.is_empty() {
            return Err(Error::InvalidUniverse("no sample points"));
        }
        if points.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidUniverse("sample points must be finite"));
        }
        if points.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidUniverse("sample points must be strictly increasing"));
        }

        Ok(Self(points.into()))
    }

    /// `n` evenly spaced samples over `min..=max`
    pub fn linspace(min: f64, max: f64, n: usize) -> Result<Self> {
        Self::new(Linspace::new(min, max, n).collect::<Vec<_>>())
    }

    /// Samples `range.start(), range.start() + step, ...` up to `range.end()`.
    pub fn with_step(range: RangeInclusive<f64>, step: f64) -> Result<Self> {
        let (min, max) = range.into_inner();

        if step <= 0. || !step.is_finite() {
            return Err(Error::InvalidUniverse("step must be positive"));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidUniverse("sample points must be finite"));
        }
        if min > max {
            return Err(Error::InvalidUniverse("empty range"));
        }

        let samples = Linspace::stepped(min, max, step).ok_or(Error::InvalidUniverse("too many sample points"))?;

        Self::new(samples.collect::<Vec<_>>())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.0[0]
    }

    pub fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Whether both universes share the same samples
    pub(crate) fn ptr_eq(&self, other: &Universe) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl AsRef<[f64]> for Universe {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// A fuzzy set sampled over a universe.
///
/// Terms built with [`Term::new`] are unbound; [`Variables::set_term`] binds
/// them to a variable.
#[derive(Clone, Debug)]
pub struct Term {
    universe: Universe,
    membership: Arc<[f64]>,
    variable: Option<(RegistryId, VariableKey)>,
}

impl Term {
    pub fn new(universe: Universe, membership: impl Into<Vec<f64>>) -> Result<Self> {
        let membership = membership.into();

        if membership.len() != universe.len() {
            return Err(Error::LengthMismatch {
                expected: universe.len(),
                found: membership.len(),
            });
        }
        if let Some(m) = membership.iter().find(|m| !(0. ..=1.).contains(*m)) {
            return Err(Error::DegreeOutOfRange(*m));
        }

        Ok(Self {
            universe,
            membership: membership.into(),
            variable: None,
        })
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn membership(&self) -> &[f64] {
        &self.membership
    }

    /// Membership degree of an arbitrary crisp value, interpolating between
    /// samples and clamping outside the universe.
    pub fn membership_value(&self, value: f64) -> f64 {
        interp_membership(self.universe.as_slice(), &self.membership, value)
    }

    /// Key of the owning variable
    pub fn variable(&self) -> Result<VariableKey> {
        self.variable.map(|(_, key)| key).ok_or(Error::UnboundTerm)
    }
}

#[derive(Debug)]
pub struct Variable {
    name: String,
    universe: Universe,
    terms: HashMap<String, Term>,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term(&self, name: &str) -> Result<&Term> {
        self.terms.get(name).ok_or_else(|| Error::UnknownTerm {
            variable: self.name.clone(),
            term: name.to_owned(),
        })
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.terms.iter().map(|(name, term)| (name.as_str(), term))
    }
}

/// Registry owning every linguistic variable of a system.
///
/// Terms remember the registry that bound them, so a term is never resolved
/// against a registry whose keys merely happen to line up with its own.
#[derive(Debug)]
pub struct Variables {
    id: RegistryId,
    vars: SlotMap<VariableKey, Variable>,
    names: HashMap<String, VariableKey>,
}

impl Default for Variables {
    fn default() -> Self {
        Self {
            id: RegistryId::next(),
            vars: SlotMap::default(),
            names: HashMap::new(),
        }
    }
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, universe: Universe) -> Result<VariableKey> {
        let name = name.into();

        if self.names.contains_key(&name) {
            return Err(Error::DuplicateVariable(name));
        }

        let key = self.vars.insert(Variable {
            name: name.clone(),
            universe,
            terms: HashMap::new(),
        });

        self.names.insert(name, key);

        Ok(key)
    }

    /// Defines (or replaces) term `name` of variable `var` and returns the bound term.
    pub fn set_term(
        &mut self,
        var: VariableKey,
        name: impl Into<String>,
        membership: impl Into<Vec<f64>>,
    ) -> Result<Term> {
        let variable = self
            .vars
            .get_mut(var)
            .ok_or_else(|| Error::UnknownVariable(format!("{var:?}")))?;
        let mut term = Term::new(variable.universe.clone(), membership)?;

        term.variable = Some((self.id, var));
        variable.terms.insert(name.into(), term.clone());

        Ok(term)
    }

    pub fn get(&self, var: VariableKey) -> Option<&Variable> {
        self.vars.get(var)
    }

    pub fn key(&self, name: &str) -> Option<VariableKey> {
        self.names.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Result<&Variable> {
        self.key(name)
            .map(|key| &self.vars[key])
            .ok_or_else(|| Error::UnknownVariable(name.to_owned()))
    }

    /// Looks up `variable[term]`
    pub fn term(&self, variable: &str, term: &str) -> Result<&Term> {
        self.by_name(variable)?.term(term)
    }

    /// Variable a term is bound to; fails for terms bound by another registry
    pub fn variable_of(&self, term: &Term) -> Result<&Variable> {
        let (registry, key) = term.variable.ok_or(Error::UnboundTerm)?;

        if registry != self.id {
            return Err(Error::ForeignTerm);
        }

        self.get(key).ok_or_else(|| Error::UnknownVariable(format!("{key:?}")))
    }

    /// Name of the variable a term is bound to
    pub fn variable_name(&self, term: &Term) -> Result<&str> {
        self.variable_of(term).map(Variable::name)
    }

    /// Universe of the variable a term is bound to
    pub fn variable_universe(&self, term: &Term) -> Result<&Universe> {
        self.variable_of(term).map(Variable::universe)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableKey, &Variable)> {
        self.vars.iter()
    }
}

impl Index<VariableKey> for Variables {
    type Output = Variable;

    fn index(&self, key: VariableKey) -> &Variable {
        &self.vars[key]
    }
}
