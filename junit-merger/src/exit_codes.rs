// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `junit-merger` failures.
///
/// Merges may fail for a variety of reasons. This structure documents the exit codes that may occur
/// in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1. Command-line usage errors, such as
/// passing no input files, result in exit code 2.
pub enum MergerExitCode {}

impl MergerExitCode {
    /// No errors occurred and the merged report was produced.
    pub const OK: i32 = 0;

    /// An input file could not be read.
    pub const INPUT_READ_FAILED: i32 = 101;

    /// An input file could not be parsed as a JUnit report.
    pub const PARSE_FAILED: i32 = 102;

    /// The inputs parsed, but their `tests` or `failures` totals do not fit in the merged report.
    pub const MERGE_FAILED: i32 = 104;

    /// The merged report could not be serialized.
    pub const SERIALIZE_FAILED: i32 = 103;

    /// Writing the merged report to its destination produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
