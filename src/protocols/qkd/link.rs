//! One qubit's journey from Alice to Bob.
//!
//! The stages are encoded in the type of [`Transit`]: a qubit is prepared,
//! then passes Eve, then the noisy channel, and only then can Bob measure it.
//! Each step consumes the previous stage, so the order cannot be rearranged.

use super::eavesdropper::{Eavesdropper, Interception};
use crate::{Basis, QuantumChannel, Qubit, errors::StateError};
use rand::Rng;
use std::marker::PhantomData;

/// Alice has encoded her bit.
#[derive(Debug)]
pub struct Prepared;
/// Eve has had her chance at the qubit.
#[derive(Debug)]
pub struct Tapped;
/// Channel noise has been applied; the qubit is at Bob's detector.
#[derive(Debug)]
pub struct Delivered;

/// What happened to one qubit on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitReport {
    pub interception: Option<Interception>,
    pub noise_flipped: bool,
}

#[derive(Debug)]
pub struct Transit<S> {
    qubit: Qubit,
    report: TransitReport,
    _stage: PhantomData<S>,
}

impl Transit<Prepared> {
    /// Alice encodes `bit` in `basis`.
    pub fn prepare(bit: bool, basis: Basis) -> Result<Self, StateError> {
        Ok(Self {
            qubit: Qubit::prepare(bit, basis)?,
            report: TransitReport {
                interception: None,
                noise_flipped: false,
            },
            _stage: PhantomData,
        })
    }

    /// Passes the qubit by Eve, if she is on the line.
    pub fn pass_eavesdropper<R: Rng + ?Sized>(
        mut self,
        eve: Option<&Eavesdropper>,
        rng: &mut R,
    ) -> Result<Transit<Tapped>, StateError> {
        if let Some(eve) = eve {
            self.report.interception = eve.attack(&mut self.qubit, rng)?;
        }
        Ok(Transit {
            qubit: self.qubit,
            report: self.report,
            _stage: PhantomData,
        })
    }
}

impl Transit<Tapped> {
    /// Applies the bit-flip channel. Branch 0 of the channel is the no-op.
    pub fn pass_noise<R: Rng + ?Sized>(
        mut self,
        noise: &QuantumChannel,
        rng: &mut R,
    ) -> Result<Transit<Delivered>, StateError> {
        self.report.noise_flipped = self.qubit.apply_channel(noise, rng)? != 0;
        Ok(Transit {
            qubit: self.qubit,
            report: self.report,
            _stage: PhantomData,
        })
    }
}

impl Transit<Delivered> {
    /// Bob measures in `basis`; the qubit is consumed.
    pub fn measure<R: Rng + ?Sized>(
        mut self,
        basis: Basis,
        rng: &mut R,
    ) -> Result<(bool, TransitReport), StateError> {
        let bit = self.qubit.measure_in(basis, rng)?;
        Ok((bit, self.report))
    }
}
