use thiserror::Error;

/// Errors surfaced while producing the garbled stream.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("gate {gate}: arity {arity} not supported")]
    InvalidArity { gate: usize, arity: usize },
    #[error("no OT key pair for evaluator-input wire {wire}")]
    MissingOtKeys { wire: usize },
    #[error("generator-input gate {wire} beyond the configured mask")]
    MaskExhausted { wire: usize },
}

/// Errors surfaced while consuming the garbled stream.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("gate {gate}: stream ends early, need {need} bytes, have {have}")]
    BufferUnderrun {
        gate: usize,
        need: usize,
        have: usize,
    },
    #[error("gate {gate}: arity {arity} not supported")]
    InvalidArity { gate: usize, arity: usize },
    #[error("no OT key for evaluator-input wire {wire}")]
    MissingOtKey { wire: usize },
    #[error("no decommitment provided for generator-input bit {0}")]
    MissingDecommitment(usize),
    #[error("binding row {row}: stream ends early, need {need} bytes, have {have}")]
    RowUnderrun {
        row: usize,
        need: usize,
        have: usize,
    },
}
