// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with beam calculations.

use thiserror::Error;

use crate::instrument::InstrumentError;

#[derive(Error, Debug)]
pub enum BeamError {
    #[error("Invalid frequency {0} MHz; the frequency must be finite and positive")]
    InvalidFrequency(f64),

    #[error("The worker count must be at least 1")]
    NoWorkers,

    #[error("A phasor worker panicked; the array-factor computation was aborted")]
    WorkerPanicked,

    #[error("The mini-array list of a digital beam cannot be empty")]
    NoMiniArrays,

    #[error(transparent)]
    Instrument(#[from] InstrumentError),
}
