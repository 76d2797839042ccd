use std::collections::HashMap;

use tracing::warn;

use crate::error::{Error, Result};
use crate::variable::{Term, VariableKey};

/// Conjunction of antecedent terms implying a consequent term.
///
/// Holds at most one antecedent per variable: when two antecedents share a
/// variable, the later one replaces the earlier.
#[derive(Clone, Debug)]
pub struct Rule {
    antecedents: HashMap<VariableKey, Term>,
    consequent: Term,
}

impl Rule {
    pub fn new(antecedents: impl IntoIterator<Item = Term>, consequent: Term) -> Result<Self> {
        let mut by_variable = HashMap::new();

        for term in antecedents {
            let key = term.variable()?;

            if by_variable.insert(key, term).is_some() {
                warn!(?key, "rule has two antecedents on one variable, keeping the last");
            }
        }

        consequent.variable()?;

        if by_variable.is_empty() {
            return Err(Error::EmptyRule);
        }

        Ok(Self {
            antecedents: by_variable,
            consequent,
        })
    }

    pub fn antecedent(&self, var: VariableKey) -> Option<&Term> {
        self.antecedents.get(&var)
    }

    pub fn antecedents(&self) -> impl Iterator<Item = (VariableKey, &Term)> {
        self.antecedents.iter().map(|(key, term)| (*key, term))
    }

    pub fn consequent(&self) -> &Term {
        &self.consequent
    }
}

/// An ordered rule base
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, antecedents: impl IntoIterator<Item = Term>, consequent: Term) -> Result<()> {
        self.0.push(Rule::new(antecedents, consequent)?);

        Ok(())
    }

    pub fn push(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Rules(iter.into_iter().collect())
    }
}

impl<'r> IntoIterator for &'r Rules {
    type Item = &'r Rule;
    type IntoIter = std::slice::Iter<'r, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
