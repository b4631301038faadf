// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge sharded JUnit XML reports into a single report.
//!
//! CI pipelines that split a test run across parallel workers end up with one JUnit file per
//! worker. `junit-merger` folds them into one `<testsuite>` for downstream reporting tools. The
//! parsing and merging logic lives in the [`junit_merge`] crate; this crate is the command-line
//! front end.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod exit_codes;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
pub use exit_codes::MergerExitCode;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter, StderrStyles};
