//! Intercept-resend eavesdropper.
//!
//! Eve sits on the quantum channel between Alice and Bob. For each qubit she
//! independently decides whether to intercept it; an intercepted qubit is
//! measured in a basis of her choosing and replaced by a freshly prepared one.

use crate::core::errors::ChannelError;
use crate::core::validate_prob;
use crate::{Basis, Qubit, errors::StateError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What Eve encodes in the qubit she forwards to Bob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResendStrategy {
    /// A fresh random bit in her basis, unrelated to what she measured.
    #[default]
    RandomBit,
    /// The bit she measured, in her basis.
    MeasuredBit,
}

/// Record of one intercepted qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interception {
    pub basis: Basis,
    pub measured: bool,
    pub resent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eavesdropper {
    intercept_probability: f64,
    resend: ResendStrategy,
}

impl Eavesdropper {
    pub fn new(intercept_probability: f64, resend: ResendStrategy) -> Result<Self, ChannelError> {
        validate_prob(intercept_probability)?;
        Ok(Self {
            intercept_probability,
            resend,
        })
    }

    pub fn intercept_probability(&self) -> f64 {
        self.intercept_probability
    }

    pub fn resend_strategy(&self) -> ResendStrategy {
        self.resend
    }

    /// Possibly intercepts `qubit`, replacing it in place with Eve's resend.
    ///
    /// Returns `None` when the qubit passed through untouched.
    pub fn attack<R: Rng + ?Sized>(
        &self,
        qubit: &mut Qubit,
        rng: &mut R,
    ) -> Result<Option<Interception>, StateError> {
        if !rng.random_bool(self.intercept_probability) {
            return Ok(None);
        }

        let basis = Basis::random(rng);
        let measured = qubit.measure_in(basis, rng)?;

        let resent = match self.resend {
            ResendStrategy::RandomBit => rng.random_bool(0.5),
            ResendStrategy::MeasuredBit => measured,
        };
        *qubit = Qubit::prepare(resent, basis)?;

        Ok(Some(Interception {
            basis,
            measured,
            resent,
        }))
    }
}
