use std::collections::BTreeMap;

/// Crisp value of each input variable, keyed by variable name.
///
/// Iteration is in name order, which fixes the order antecedent degrees are
/// aggregated in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) BTreeMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(BTreeMap::new())
    }

    pub fn add(&mut self, var: impl Into<String>, val: f64) {
        self.0.insert(var.into(), val);
    }

    pub fn with(mut self, var: impl Into<String>, val: f64) -> Self {
        self.add(var, val);
        self
    }

    pub fn get(&self, var: &str) -> Option<f64> {
        self.0.get(var).copied()
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

impl<K: Into<String>> FromIterator<(K, f64)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Inputs(iter.into_iter().map(|(var, val)| (var.into(), val)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Inputs {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[test]
fn test_inputs() {
    let mut inputs = Inputs::from([("service", 9.8), ("quality", 6.5)]);

    assert_eq!(inputs.iter().map(|(name, _)| name).collect::<Vec<_>>(), ["quality", "service"]);

    inputs.add("quality", 3.);

    assert_eq!(inputs.get("quality"), Some(3.));
    assert_eq!(inputs.len(), 2);
    assert_eq!(Inputs::new().with("height", 190.).get("height"), Some(190.));
    assert!(Inputs::new().is_empty());
}
