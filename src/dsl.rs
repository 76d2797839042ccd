use crate::error::Result;
use crate::rules::Rule;
use crate::variable::Term;

/// Antecedent terms of a rule under construction, read as a conjunction.
pub struct Premise(Vec<Term>);

impl Premise {
    pub fn and(mut self, rhs: Term) -> Self {
        self.0.push(rhs);
        self
    }

    pub fn then(self, consequent: Term) -> Result<Rule> {
        Rule::new(self.0, consequent)
    }
}

impl Term {
    pub fn and(self, rhs: Term) -> Premise {
        Premise(vec![self, rhs])
    }

    /// Single-antecedent rule `self -> consequent`
    pub fn then(self, consequent: Term) -> Result<Rule> {
        Rule::new([self], consequent)
    }
}

impl From<Term> for Premise {
    fn from(term: Term) -> Self {
        Premise(vec![term])
    }
}

#[test]
fn test_premise() {
    use crate::membership::trapmf;
    use crate::variable::{Universe, Variables};

    let mut vars = Variables::new();
    let universe = Universe::with_step(0. ..=100., 1.).unwrap();
    let skill = vars.add("skill", universe.clone()).unwrap();
    let height = vars.add("height", Universe::with_step(170. ..=236., 1.).unwrap()).unwrap();
    let confidence = vars.add("confidence", universe.clone()).unwrap();

    let good = vars.set_term(skill, "good", trapmf(universe.as_slice(), [45., 50., 65., 70.])).unwrap();
    let universe = vars[height].universe().clone();
    let tall = vars.set_term(height, "tall", trapmf(universe.as_slice(), [203., 206., 217., 222.])).unwrap();
    let universe = vars[confidence].universe().clone();
    let full = vars.set_term(confidence, "full", trapmf(universe.as_slice(), [80., 85., 100., 100.])).unwrap();

    let rule = good.clone().and(tall).then(full.clone()).unwrap();

    assert_eq!(rule.antecedents().count(), 2);
    assert!(rule.antecedent(height).is_some());
    assert_eq!(rule.consequent().variable(), Ok(confidence));

    let rule = Premise::from(good).then(full).unwrap();

    assert_eq!(rule.antecedents().count(), 1);
    assert!(rule.antecedent(skill).is_some());
}
