// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Workflow state machines for cars, rides, pauses, KYC and listings.
//!
//! Every function here is pure: it takes the current record, the facts it is
//! checked against and a command, and returns the next record plus the audit
//! event describing the change. Nothing is read from or written to storage.

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{apply_car, apply_kyc, apply_listing, apply_pause, apply_ride};
pub use command::{CarCommand, KycCommand, ListingCommand, PauseCommand, RideCommand};
pub use error::CoreError;
pub use state::{PauseContext, RideContext, TransitionResult};
