use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use num::Float;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Built-in binary operators on membership degrees: t-norms, s-norms and
/// implications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum BinaryOp {
    /// Standard t-norm (fuzzy and)
    Min,
    /// Standard s-norm (fuzzy or)
    Max,
    /// Algebraic product t-norm
    Prod,
    /// Probabilistic sum s-norm: `x + y - xy`
    ProbSum,
    /// Łukasiewicz (bounded difference) t-norm: `max(x + y - 1, 0)`
    LukasiewiczAnd,
    /// Łukasiewicz (bounded sum) s-norm: `min(x + y, 1)`
    LukasiewiczOr,
    /// Łukasiewicz implication: `min(1, 1 - x + y)`
    LukasiewiczImplication,
    DrasticProd,
    DrasticSum,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 9] = [
        Self::Min,
        Self::Max,
        Self::Prod,
        Self::ProbSum,
        Self::LukasiewiczAnd,
        Self::LukasiewiczOr,
        Self::LukasiewiczImplication,
        Self::DrasticProd,
        Self::DrasticSum,
    ];

    pub fn call<F: Float>(self, x: F, y: F) -> F {
        match self {
            Self::Min => F::min(x, y),
            Self::Max => F::max(x, y),
            Self::Prod => x * y,
            Self::ProbSum => x + y - x * y,
            Self::LukasiewiczAnd => F::max(x + y - F::one(), F::zero()),
            Self::LukasiewiczOr => F::min(x + y, F::one()),
            Self::LukasiewiczImplication => F::min(F::one(), F::one() - x + y),
            Self::DrasticProd => {
                if x == F::one() {
                    y
                } else if y == F::one() {
                    x
                } else {
                    F::zero()
                }
            },
            Self::DrasticSum => {
                if x == F::zero() {
                    y
                } else if y == F::zero() {
                    x
                } else {
                    F::one()
                }
            },
        }
    }

    /// Registry key of this operator
    pub fn name(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Prod => "prod",
            Self::ProbSum => "sum",
            Self::LukasiewiczAnd => "t_lukas",
            Self::LukasiewiczOr => "s_lukas",
            Self::LukasiewiczImplication => "act_lukas",
            Self::DrasticProd => "drastic_prod",
            Self::DrasticSum => "drastic_sum",
        }
    }
}

impl FromStr for BinaryOp {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| Error::UnknownOperator(name.to_owned()))
    }
}

impl From<BinaryOp> for &'static str {
    fn from(op: BinaryOp) -> Self {
        op.name()
    }
}

/// Method for reducing a membership curve to a crisp value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum DefuzzificationOp {
    /// Discrete center of gravity: `Σ(u·m) / Σm`
    Centroid,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
    /// Value splitting the area under the curve into two equal halves
    Bisector,
}

impl DefuzzificationOp {
    pub const ALL: [DefuzzificationOp; 5] = [Self::Centroid, Self::Mom, Self::Lom, Self::Som, Self::Bisector];

    /// Reduces a curve to a crisp value; `None` when the curve has no support
    /// for this operator (empty, or all zero for a centroid).
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> Option<F> {
        debug_assert_eq!(universe.len(), membership.len());

        match self {
            Self::Centroid => {
                let den = membership.iter().fold(F::zero(), |acc, &m| acc + m);

                if den == F::zero() {
                    return None;
                }

                let num = universe
                    .iter()
                    .zip(membership)
                    .fold(F::zero(), |acc, (&u, &m)| acc + u * m);

                Some(num / den)
            },
            Self::Mom => {
                let (len, sum) =
                    maxima(universe, membership)?.fold((0usize, F::zero()), |(len, sum), u| (len + 1, sum + u));

                F::from(len).map(|len| sum / len)
            },
            Self::Lom => maxima(universe, membership).and_then(|mut us| us.next_back()),
            Self::Som => maxima(universe, membership).and_then(|mut us| us.next()),
            Self::Bisector => bisector(universe, membership),
        }
    }

    /// Registry key of this operator
    pub fn name(self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::Mom => "mom",
            Self::Lom => "lom",
            Self::Som => "som",
            Self::Bisector => "bisector",
        }
    }
}

impl FromStr for DefuzzificationOp {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| Error::UnknownOperator(name.to_owned()))
    }
}

impl From<DefuzzificationOp> for &'static str {
    fn from(op: DefuzzificationOp) -> Self {
        op.name()
    }
}

/// Universe samples attaining the curve's maximum degree, in ascending order.
/// `None` for an empty curve.
fn maxima<'a, F: Float>(universe: &'a [F], membership: &'a [F]) -> Option<impl DoubleEndedIterator<Item = F> + 'a> {
    let maximum = membership.iter().copied().reduce(F::max)?;

    Some(
        universe
            .iter()
            .zip(membership)
            .filter_map(move |(&u, &m)| if m == maximum { Some(u) } else { None }),
    )
}

fn bisector<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let two = F::one() + F::one();

    if universe.len() == 1 {
        return if membership[0] > F::zero() { Some(universe[0]) } else { None };
    }

    // Trapezoid area of each span between neighbouring samples
    let areas: Vec<F> = universe
        .windows(2)
        .zip(membership.windows(2))
        .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
        .collect();
    let total = areas.iter().fold(F::zero(), |acc, &a| acc + a);

    if total == F::zero() {
        return None;
    }

    let target = total / two;
    let mut cum_area = F::zero();

    for (i, &area) in areas.iter().enumerate() {
        if cum_area + area >= target {
            // Linear interpolation of the cumulative area inside the span
            let frac = if area == F::zero() { F::zero() } else { (target - cum_area) / area };

            return Some(universe[i] + frac * (universe[i + 1] - universe[i]));
        }
        cum_area = cum_area + area;
    }

    universe.last().copied()
}

/// Signature of a caller-supplied binary operator
pub type BinaryFn = dyn Fn(f64, f64) -> f64 + Send + Sync;

/// Signature of a caller-supplied defuzzifier: `(universe, membership) -> crisp value`
pub type DefuzzifyFn = dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync;

/// A binary operator slot in an [`OperatorConfig`](crate::OperatorConfig):
/// either a registry entry or a caller-supplied function.
#[derive(Clone)]
pub enum BinaryOperator {
    Builtin(BinaryOp),
    Custom(Arc<BinaryFn>),
}

impl BinaryOperator {
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse().map(Self::Builtin)
    }

    pub fn custom(f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    #[inline]
    pub fn call(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Builtin(op) => op.call(x, y),
            Self::Custom(f) => f(x, y),
        }
    }
}

impl From<BinaryOp> for BinaryOperator {
    fn from(op: BinaryOp) -> Self {
        Self::Builtin(op)
    }
}

impl FromStr for BinaryOperator {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name)
    }
}

impl fmt::Debug for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(op) => write!(f, "{}", op.name()),
            Self::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl<'de> Deserialize<'de> for BinaryOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;

        Self::from_name(&name).map_err(serde::de::Error::custom)
    }
}

/// The defuzzification slot in an [`OperatorConfig`](crate::OperatorConfig).
#[derive(Clone)]
pub enum Defuzzifier {
    Builtin(DefuzzificationOp),
    Custom(Arc<DefuzzifyFn>),
}

impl Defuzzifier {
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse().map(Self::Builtin)
    }

    pub fn custom(f: impl Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Builtin(op) => op.name(),
            Self::Custom(_) => "custom",
        }
    }

    pub fn call(&self, universe: &[f64], membership: &[f64]) -> Option<f64> {
        match self {
            Self::Builtin(op) => op.call(universe, membership),
            Self::Custom(f) => Some(f(universe, membership)),
        }
    }
}

impl From<DefuzzificationOp> for Defuzzifier {
    fn from(op: DefuzzificationOp) -> Self {
        Self::Builtin(op)
    }
}

impl FromStr for Defuzzifier {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name)
    }
}

impl fmt::Debug for Defuzzifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(op) => write!(f, "{}", op.name()),
            Self::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl<'de> Deserialize<'de> for Defuzzifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;

        Self::from_name(&name).map_err(serde::de::Error::custom)
    }
}
