//! BB84 quantum key distribution simulator.
//!
//! Single qubits are simulated as state vectors. A run prepares qubits for
//! Alice, passes them by an optional intercept-resend eavesdropper and a
//! bit-flip channel, measures them for Bob, then sifts the results and
//! estimates the quantum bit error rate. [`exchange_key`] repeats runs until
//! one is not flagged; the accepted key can drive the demonstration
//! [`cipher`].

pub mod cipher;
pub mod config;
mod core;
mod key;
pub mod protocols;
mod sampler;

pub use crate::config::ProtocolConfig;
pub use crate::core::{
    Basis, Gate, Measurement, MeasurementResult, QuantumChannel, Qubit, errors, utils,
};
pub use crate::key::AcceptedKey;
pub use crate::protocols::bb84::{
    DetectionVerdict, RunRecord, SiftedKeyPair, run_configured, run_protocol,
};
pub use crate::protocols::eavesdropper::{Eavesdropper, Interception, ResendStrategy};
pub use crate::protocols::session::{
    AttemptLog, KeyExchange, KeyOutcome, exchange_key, run_with_retry,
};
pub use crate::sampler::Sampler;
