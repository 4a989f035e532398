// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with instrument lookups.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstrumentError {
    #[error("No mini-array has the identifier {0}")]
    UnknownMiniArray(u32),

    #[error("Unrecognised polarisation '{0}'; expected 'NW' or 'NE'")]
    UnknownPolarisation(String),
}
