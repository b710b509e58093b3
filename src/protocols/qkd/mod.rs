//! Quantum Key Distribution (QKD) with the BB84 protocol.
//!
//! - **eavesdropper**: intercept-resend attack model.
//! - **link**: the ordered transmission pipeline for a single qubit.
//! - **bb84**: one protocol run, sifting and QBER.
//! - **session**: repeated runs until a key passes detection.

pub mod bb84;
pub mod eavesdropper;
pub mod link;
pub mod session;
