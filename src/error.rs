use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A term's owning variable was queried before the term was bound to one
    #[error("term is not bound to a variable")]
    UnboundTerm,

    /// A term bound in one [`Variables`](crate::Variables) registry was used with another
    #[error("term is bound to a variable of another registry")]
    ForeignTerm,

    #[error("input of the system is empty")]
    MissingInput,

    #[error("input {0} is not a finite number")]
    InvalidInput(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// Rule `rule` shares no antecedent variable with the given input
    #[error("rule {rule} matched no antecedent variable in the input")]
    EmptyAggregation { rule: usize },

    /// The accumulated curve of output `variable` cannot be reduced by `operator`
    #[error("{operator} is undefined for the accumulated curve of {variable}, which has no support")]
    DegenerateReduction { operator: &'static str, variable: String },

    #[error("invalid universe: {0}")]
    InvalidUniverse(&'static str),

    #[error("membership curve has {found} samples but the universe has {expected}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("membership degree {0} is outside [0, 1]")]
    DegreeOutOfRange(f64),

    #[error("variable {0} is already defined")]
    DuplicateVariable(String),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("variable {variable} has no term named {term}")]
    UnknownTerm { variable: String, term: String },

    #[error("a rule needs at least one antecedent")]
    EmptyRule,

    #[error("no rule produced output variable {0}")]
    OutputNotProduced(String),

    #[error("stages were not recorded for this inference")]
    StagesNotRecorded,
}
