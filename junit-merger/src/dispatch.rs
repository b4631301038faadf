// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result},
    exit_codes::MergerExitCode,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use junit_merge::{MergedReport, parse};
use std::io::Write;
use tracing::{debug, info};

/// Merge JUnit XML reports into a single report.
///
/// Each input may be rooted at either <testsuite> or <testsuites>. Every suite found is folded into
/// one <testsuite>: tests, failures and time are summed, test content is concatenated in input
/// order, and the name of the last suite processed names the merged report.
#[derive(Debug, Parser)]
#[command(
    version,
    name = "junit-merger",
    styles = crate::output::clap_styles::style()
)]
pub struct JunitMergerApp {
    /// Write the merged report to this path instead of stdout
    ///
    /// Parent directories are created if necessary. The file is replaced atomically, and is left
    /// untouched if the merge fails.
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<Utf8PathBuf>,

    #[command(flatten)]
    output_opts: OutputOpts,

    /// JUnit report files to merge, in order
    #[arg(value_name = "FILES", required = true)]
    files: Vec<Utf8PathBuf>,
}

impl JunitMergerApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output_opts.init()
    }

    /// Executes the app.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let merged = merge_files(&self.files, output)?;
        let report = merged.finalize()?;

        match &self.output {
            Some(path) => {
                write_output_file(path, &report)?;
                info!("merged {} reports to {}", self.files.len(), path);
            }
            None => {
                let mut writer = output_writer.stdout_writer();
                writer
                    .write_all(report.as_bytes())
                    .and_then(|()| writer.flush())
                    .map_err(|err| ExpectedError::StdoutWriteFailed { err })?;
            }
        }

        Ok(MergerExitCode::OK)
    }
}

/// Reads, parses and accumulates each file in order. The first failure aborts the merge.
fn merge_files(files: &[Utf8PathBuf], output: OutputContext) -> Result<MergedReport> {
    let mut merged = MergedReport::new();

    for path in files {
        let bytes =
            fs_err::read(path).map_err(|err| ExpectedError::input_read_failed(path.clone(), err))?;
        let parsed = parse(&bytes).map_err(|err| ExpectedError::parse_failed(path.clone(), err))?;

        if output.verbose {
            info!(
                "{path}: {} with {} testsuite(s)",
                parsed.kind,
                parsed.fragments.len()
            );
        } else {
            debug!(%path, kind = %parsed.kind, fragments = parsed.fragments.len(), "parsed input");
        }

        merged
            .accumulate_all(parsed.into_fragments())
            .map_err(|err| ExpectedError::merge_failed(path.clone(), err))?;
    }

    Ok(merged)
}

fn write_output_file(path: &Utf8Path, report: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
        fs_err::create_dir_all(dir)
            .map_err(|err| ExpectedError::output_dir_create_failed(dir.to_owned(), err))?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| file.write_all(report.as_bytes()))
        .map_err(|err| ExpectedError::OutputWriteFailed {
            path: path.to_owned(),
            err,
        })
}
