mod channels;
pub mod errors;
mod gates;
mod measurements;
mod state;
pub mod utils;

pub use channels::QuantumChannel;
pub(crate) use channels::validate_prob;
pub use gates::Gate;
pub use measurements::{Basis, Measurement, MeasurementResult};
pub use state::Qubit;
