// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{exit_codes::MergerExitCode, output::StderrStyles};
use camino::Utf8PathBuf;
use junit_merge::{MergeError, ParseError, SerializeError};
use owo_colors::OwoColorize;
use std::{error::Error, io};
use thiserror::Error;
use tracing::{error, info};

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected failure while merging reports.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("input file read error")]
    InputReadFailed {
        path: Utf8PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("input file parse error")]
    ParseFailed {
        path: Utf8PathBuf,
        #[source]
        err: ParseError,
    },
    #[error("input file merge error")]
    MergeFailed {
        path: Utf8PathBuf,
        #[source]
        err: MergeError,
    },
    #[error("merged report serialize error")]
    SerializeFailed {
        #[from]
        err: SerializeError,
    },
    #[error("failed to create output directory")]
    OutputDirCreateFailed {
        dir: Utf8PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("failed to write output file")]
    OutputWriteFailed {
        path: Utf8PathBuf,
        #[source]
        err: atomicwrites::Error<io::Error>,
    },
    #[error("failed to write to stdout")]
    StdoutWriteFailed {
        #[source]
        err: io::Error,
    },
}

impl ExpectedError {
    pub(crate) fn input_read_failed(path: impl Into<Utf8PathBuf>, err: io::Error) -> Self {
        Self::InputReadFailed {
            path: path.into(),
            err,
        }
    }

    pub(crate) fn parse_failed(path: impl Into<Utf8PathBuf>, err: ParseError) -> Self {
        Self::ParseFailed {
            path: path.into(),
            err,
        }
    }

    pub(crate) fn merge_failed(path: impl Into<Utf8PathBuf>, err: MergeError) -> Self {
        Self::MergeFailed {
            path: path.into(),
            err,
        }
    }

    pub(crate) fn output_dir_create_failed(dir: impl Into<Utf8PathBuf>, err: io::Error) -> Self {
        Self::OutputDirCreateFailed {
            dir: dir.into(),
            err,
        }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::InputReadFailed { .. } => MergerExitCode::INPUT_READ_FAILED,
            Self::ParseFailed { .. } => MergerExitCode::PARSE_FAILED,
            Self::MergeFailed { .. } => MergerExitCode::MERGE_FAILED,
            Self::SerializeFailed { .. } => MergerExitCode::SERIALIZE_FAILED,
            Self::OutputDirCreateFailed { .. }
            | Self::OutputWriteFailed { .. }
            | Self::StdoutWriteFailed { .. } => MergerExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::InputReadFailed { path, err } => {
                error!("failed to read input file `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::ParseFailed { path, err } => {
                error!(
                    "failed to parse JUnit report `{}`",
                    path.style(styles.bold)
                );
                if let ParseError::UnrecognizedRoot { .. } = err {
                    info!(
                        target: "junit_merger::no_heading",
                        "(reports must be rooted at <testsuite> or <testsuites>)"
                    );
                }
                Some(err as &dyn Error)
            }
            Self::MergeFailed { path, err } => {
                error!(
                    "failed to merge JUnit report `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::SerializeFailed { err } => {
                error!("failed to serialize merged report");
                Some(err as &dyn Error)
            }
            Self::OutputDirCreateFailed { dir, err } => {
                error!(
                    "failed to create output directory `{}`",
                    dir.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::OutputWriteFailed { path, err } => {
                error!(
                    "failed to write merged report to `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::StdoutWriteFailed { err } => {
                error!("failed to write merged report to stdout");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: "junit_merger::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::capture_logs;
    use pretty_assertions::assert_eq;

    #[test]
    fn exit_codes() {
        let io_err = || io::Error::new(io::ErrorKind::NotFound, "not found");

        assert_eq!(
            ExpectedError::input_read_failed("a.xml", io_err()).process_exit_code(),
            MergerExitCode::INPUT_READ_FAILED
        );
        assert_eq!(
            ExpectedError::parse_failed("a.xml", ParseError::NoRootElement).process_exit_code(),
            MergerExitCode::PARSE_FAILED
        );
        assert_eq!(
            ExpectedError::merge_failed(
                "a.xml",
                MergeError::CountOverflow {
                    attribute: "tests",
                    name: "a".to_owned(),
                }
            )
            .process_exit_code(),
            MergerExitCode::MERGE_FAILED
        );
        assert_eq!(
            ExpectedError::output_dir_create_failed("out", io_err()).process_exit_code(),
            MergerExitCode::WRITE_OUTPUT_ERROR
        );
        assert_eq!(
            ExpectedError::StdoutWriteFailed { err: io_err() }.process_exit_code(),
            MergerExitCode::WRITE_OUTPUT_ERROR
        );
    }

    #[test]
    fn display_unrecognized_root() {
        let err = ExpectedError::parse_failed(
            "bad.xml",
            ParseError::UnrecognizedRoot {
                name: "results".to_owned(),
            },
        );

        let output = capture_logs(|| err.display_to_stderr(&StderrStyles::default()));

        assert_eq!(
            output,
            "error: failed to parse JUnit report `bad.xml`\n\
             (reports must be rooted at <testsuite> or <testsuites>)\n\
             \n\
             Caused by:\n  \
             unrecognized root element <results> (expected <testsuite> or <testsuites>)\n"
        );
    }

    #[test]
    fn display_follows_source_chain() {
        let bad_suite = junit_merge::parse(
            b"<testsuites><testsuite tests=\"1\"/><testsuite tests=\"x\"/></testsuites>",
        )
        .unwrap_err();
        let err = ExpectedError::parse_failed("shard.xml", bad_suite);

        let output = capture_logs(|| err.display_to_stderr(&StderrStyles::default()));

        assert_eq!(
            output,
            "error: failed to parse JUnit report `shard.xml`\n\
             \n\
             Caused by:\n  \
             testsuite at index 1 of <testsuites> is malformed\n\
             \n\
             Caused by:\n  \
             invalid value `x` for attribute `tests`\n"
        );
    }

    #[test]
    fn display_count_overflow() {
        let err = ExpectedError::merge_failed(
            "b.xml",
            MergeError::CountOverflow {
                attribute: "failures",
                name: "b".to_owned(),
            },
        );

        let output = capture_logs(|| err.display_to_stderr(&StderrStyles::default()));

        assert_eq!(
            output,
            "error: failed to merge JUnit report `b.xml`\n\
             \n\
             Caused by:\n  \
             total `failures` overflowed while merging testsuite `b`\n"
        );
    }
}
