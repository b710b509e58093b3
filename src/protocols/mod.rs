//! Quantum Cryptography Protocols.

pub mod qkd;
pub use qkd::{bb84, eavesdropper, session};
