//! Streaming garbled-circuit engine for a cut-and-choose two-party
//! computation.
//!
//! The [`Garbler`] walks a circuit gate by gate and emits the garbled
//! byte stream; the [`Evaluator`] consumes the same stream gate by gate
//! and recovers the output bits. Both fold the stream into a running
//! hash so a cheating peer is caught when instances are opened, and both
//! speak the generator-input binding rows that tie the generator to one
//! input across instances.

pub mod config;
pub mod decommit;
pub mod errors;
pub mod evaluator;
pub mod generator;
pub mod hash;
pub mod label;
pub mod protocol;

pub use config::GarbleConfig;
pub use decommit::Decommit;
pub use errors::{EvaluatorError, GeneratorError};
pub use evaluator::Evaluator;
pub use generator::Garbler;
pub use hash::RunningHash;
pub use protocol::{EvaluatorOutcome, GeneratorOutcome, ProtocolError, TwoPartyGarbling};
