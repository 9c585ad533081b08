use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DicteeError {
    /// The day/month/year combination is not a calendar date
    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// A sub-value fell outside the band its grammar element accepts
    #[error("Value {value} for {what} is outside {min}..{max}")]
    OutOfRange { what: &'static str, value: i64, min: i64, max: i64 },

    /// A magnitude remainder reaches the factor, so the composed value has
    /// more than one reading
    #[error("Ambiguous magnitude in {rule}: remainder {remainder} is not below factor {factor}")]
    AmbiguousMagnitude { rule: &'static str, factor: i64, remainder: i64 },

    /// The phrase is not in any vocabulary table
    #[error("Unknown phrase: {0}")]
    UnknownPhrase(String),

    /// A phrase pattern string could not be parsed or rendered
    #[error("Malformed phrase pattern `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DicteeError>;

impl DicteeError {
    pub(crate) fn out_of_range(what: &'static str, value: i64, min: i64, max: i64) -> Self {
        DicteeError::OutOfRange { what, value, min, max }
    }
}
