// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge JUnit reports in Rust.
//!
//! JUnit documents rooted at either `<testsuite>` or `<testsuites>` are [parsed](parse) into
//! [`SuiteFragment`]s, which are then folded into a single [`MergedReport`] and serialized as one
//! `<testsuite>`.

#![warn(missing_docs)]

mod errors;
mod fragment;
mod merge;
mod serialize;

pub use errors::*;
pub use fragment::*;
pub use merge::*;
