use std::fmt;

/// Errors raised while configuring the engine or one of its components.
///
/// Everything here is reported from setup or control-thread code. The
/// per-sample paths never fail.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Sample rate must be finite and positive
    InvalidSampleRate(f32),
    /// Block size is zero or exceeds the preallocated maximum
    InvalidBlockSize { requested: usize, max: usize },
    /// Delay buffer duration must be finite and positive
    InvalidDuration(f32),
    /// Parameter range bounds are inverted or not finite
    InvalidRange { lo: f32, hi: f32 },
    /// Scale interval is not a finite positive ratio
    InvalidRatio(String),
    /// Scale needs a unison and at least one more degree
    ScaleTooSmall(usize),
    /// Value rejected at the parameter boundary (NaN or infinite)
    InvalidParamValue { name: String, value: f32 },
    /// No published parameter with this name or alias
    UnknownParam(String),
    /// No node registered under this type tag
    UnknownNode(String),
    /// Node type tag registered twice
    DuplicateNode(String),
    /// Tag ends in the reserved oversampling suffix
    ReservedTag(String),
    /// Mixing matrix does not match the number of delay lines
    MatrixSize { expected: usize, actual: usize },
    /// Voice count must be between 1 and the allocated maximum
    InvalidVoiceCount { requested: usize, max: usize },
    /// Configuration text could not be parsed
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidSampleRate(sr) => write!(f, "Invalid sample rate: {sr}"),
            EngineError::InvalidBlockSize { requested, max } => {
                write!(f, "Invalid block size {requested} (must be 1..={max})")
            }
            EngineError::InvalidDuration(d) => write!(f, "Invalid delay duration: {d} seconds"),
            EngineError::InvalidRange { lo, hi } => write!(f, "Invalid range [{lo}, {hi}]"),
            EngineError::InvalidRatio(r) => write!(f, "Invalid scale ratio: {r}"),
            EngineError::ScaleTooSmall(n) => {
                write!(f, "Scale has {n} ratios, needs unison plus at least one degree")
            }
            EngineError::InvalidParamValue { name, value } => {
                write!(f, "Rejected value {value} for parameter '{name}'")
            }
            EngineError::UnknownParam(name) => write!(f, "Unknown parameter '{name}'"),
            EngineError::UnknownNode(tag) => write!(f, "Unknown node type '{tag}'"),
            EngineError::DuplicateNode(tag) => write!(f, "Node type '{tag}' is already registered"),
            EngineError::ReservedTag(tag) => write!(f, "Node type '{tag}' uses the reserved oversampling suffix"),
            EngineError::MatrixSize { expected, actual } => {
                write!(f, "Matrix has {actual} entries, expected {expected}")
            }
            EngineError::InvalidVoiceCount { requested, max } => {
                write!(f, "Invalid voice count {requested} (must be 1..={max})")
            }
            EngineError::Config(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Fail fast on a sample rate that would poison every coefficient computation.
pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<f32, EngineError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(EngineError::InvalidSampleRate(sample_rate))
    }
}
