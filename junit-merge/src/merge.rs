// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{MergeError, SerializeError},
    fragment::{SuiteFragment, parse},
    serialize::serialize_report,
};
use std::io;
use tracing::debug;

/// The state of a [`MergedReport`].
///
/// A report that has been finalized no longer exists: [`MergedReport::finalize`] consumes it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeState {
    /// No fragments have been accumulated yet.
    Empty,

    /// At least one fragment has been accumulated.
    Accumulating,
}

/// The running aggregate of every fragment merged so far.
///
/// Merging is a fold over fragments in order: numeric fields are summed, the name is overwritten by
/// each fragment, and inner content is concatenated as-is. Suite boundaries are not preserved, and
/// nothing in the concatenated content is deduplicated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergedReport {
    name: String,
    total_time: f64,
    total_tests: u64,
    total_failures: u64,
    concatenated_content: String,
    fragment_count: usize,
}

impl MergedReport {
    /// Creates a new, empty `MergedReport`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a fragment into this report.
    ///
    /// The fragment's name replaces the current one, so the last fragment accumulated names the
    /// report.
    ///
    /// Returns [`MergeError::CountOverflow`] if the `tests` or `failures` total would exceed
    /// `u64::MAX`. The report is left unchanged in that case.
    pub fn accumulate(&mut self, fragment: SuiteFragment) -> Result<&mut Self, MergeError> {
        let total_tests = add_count(self.total_tests, fragment.tests(), "tests", &fragment)?;
        let total_failures =
            add_count(self.total_failures, fragment.failures(), "failures", &fragment)?;

        self.total_time += fragment.time();
        self.total_tests = total_tests;
        self.total_failures = total_failures;
        self.concatenated_content.push_str(fragment.inner_content());
        self.name = fragment.name().to_owned();
        self.fragment_count += 1;
        Ok(self)
    }

    /// Folds several fragments into this report, in iteration order.
    ///
    /// Stops at the first fragment that fails to accumulate. Fragments before it stay accumulated.
    pub fn accumulate_all(
        &mut self,
        fragments: impl IntoIterator<Item = SuiteFragment>,
    ) -> Result<&mut Self, MergeError> {
        for fragment in fragments {
            self.accumulate(fragment)?;
        }
        Ok(self)
    }

    /// Returns the current state of this report.
    pub fn state(&self) -> MergeState {
        if self.fragment_count == 0 {
            MergeState::Empty
        } else {
            MergeState::Accumulating
        }
    }

    /// The name of the last fragment accumulated.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sum of every fragment's time, in seconds.
    pub fn time(&self) -> f64 {
        self.total_time
    }

    /// The sum of every fragment's test count.
    pub fn tests(&self) -> u64 {
        self.total_tests
    }

    /// The sum of every fragment's failure count.
    pub fn failures(&self) -> u64 {
        self.total_failures
    }

    /// The inner content of every fragment, concatenated in accumulation order.
    pub fn content(&self) -> &str {
        &self.concatenated_content
    }

    /// The number of fragments accumulated.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Serialize this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        Ok(serialize_report(self, writer)?)
    }

    /// Serialize this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Consumes this report, producing the serialized aggregate document.
    pub fn finalize(self) -> Result<String, SerializeError> {
        debug!(
            fragments = self.fragment_count,
            tests = self.total_tests,
            failures = self.total_failures,
            "finalizing merged report"
        );
        self.to_string()
    }
}

fn add_count(
    total: u64,
    count: u64,
    attribute: &'static str,
    fragment: &SuiteFragment,
) -> Result<u64, MergeError> {
    total.checked_add(count).ok_or_else(|| MergeError::CountOverflow {
        attribute,
        name: fragment.name().to_owned(),
    })
}

/// Parses each document in order and folds all of their fragments into a single report.
///
/// The first document that fails to parse or accumulate aborts the merge.
pub fn merge_documents<'a>(
    documents: impl IntoIterator<Item = &'a [u8]>,
) -> Result<MergedReport, MergeError> {
    let mut report = MergedReport::new();
    for (index, document) in documents.into_iter().enumerate() {
        let parsed = parse(document).map_err(|err| MergeError::Parse { index, err })?;
        report.accumulate_all(parsed.into_fragments())?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParseError;
    use pretty_assertions::assert_eq;

    fn suite(name: &str, time: f64, tests: u64, failures: u64, content: &str) -> SuiteFragment {
        SuiteFragment::new(name, time, tests, failures, content)
    }

    #[test]
    fn empty_report() {
        let report = MergedReport::new();
        assert_eq!(report.state(), MergeState::Empty);
        assert_eq!(report.name(), "");
        assert_eq!(report.tests(), 0);
        assert_eq!(report.failures(), 0);
        assert_eq!(report.time(), 0.0);
        assert_eq!(report.content(), "");
    }

    #[test]
    fn accumulate_sums_and_concatenates() {
        let mut report = MergedReport::new();
        report
            .accumulate(suite("a", 1.0, 2, 0, "<testcase name=\"a\"/>"))
            .unwrap()
            .accumulate(suite("b", 2.5, 3, 1, "<testcase name=\"b\"/>"))
            .unwrap();

        assert_eq!(report.state(), MergeState::Accumulating);
        assert_eq!(report.name(), "b");
        assert_eq!(report.time(), 3.5);
        assert_eq!(report.tests(), 5);
        assert_eq!(report.failures(), 1);
        assert_eq!(
            report.content(),
            "<testcase name=\"a\"/><testcase name=\"b\"/>"
        );
        assert_eq!(report.fragment_count(), 2);
    }

    #[test]
    fn sums_are_order_insensitive_but_name_and_content_are_not() {
        let fragments = [
            suite("x", 0.5, 1, 0, "X"),
            suite("y", 0.25, 4, 2, "Y"),
            suite("z", 1.25, 7, 3, "Z"),
        ];

        let mut forward = MergedReport::new();
        forward.accumulate_all(fragments.iter().cloned()).unwrap();
        let mut reverse = MergedReport::new();
        reverse.accumulate_all(fragments.iter().rev().cloned()).unwrap();

        assert_eq!(forward.tests(), reverse.tests());
        assert_eq!(forward.failures(), reverse.failures());
        assert_eq!(forward.time(), reverse.time());

        assert_eq!(forward.name(), "z");
        assert_eq!(reverse.name(), "x");
        assert_eq!(forward.content(), "XYZ");
        assert_eq!(reverse.content(), "ZYX");
    }

    #[test]
    fn identical_content_is_not_deduplicated() {
        let mut report = MergedReport::new();
        report
            .accumulate_all([suite("s", 0.0, 1, 0, "<t/>"), suite("s", 0.0, 1, 0, "<t/>")])
            .unwrap();
        assert_eq!(report.content(), "<t/><t/>");
        assert_eq!(report.tests(), 2);
    }

    #[test]
    fn collection_merges_like_separate_files() {
        let collection: &[u8] = br#"<testsuites>
  <testsuite name="a" time="1.0" tests="2" failures="0"><testcase name="a1"/></testsuite>
  <testsuite name="b" time="2.5" tests="3" failures="1"><testcase name="b1"/></testsuite>
</testsuites>"#;
        let a: &[u8] = br#"<testsuite name="a" time="1.0" tests="2" failures="0"><testcase name="a1"/></testsuite>"#;
        let b: &[u8] = br#"<testsuite name="b" time="2.5" tests="3" failures="1"><testcase name="b1"/></testsuite>"#;

        let from_collection = merge_documents([collection]).unwrap();
        let from_files = merge_documents([a, b]).unwrap();

        assert_eq!(from_collection, from_files);
        assert_eq!(
            from_collection.to_string().unwrap(),
            from_files.to_string().unwrap()
        );
    }

    #[test]
    fn merge_documents_stops_at_first_error() {
        let good: &[u8] = b"<testsuite name=\"ok\" tests=\"1\"/>";
        let bad: &[u8] = b"<results/>";
        let err = merge_documents([good, bad, good]).unwrap_err();
        assert!(
            matches!(
                err,
                MergeError::Parse {
                    index: 1,
                    err: ParseError::UnrecognizedRoot { .. }
                }
            ),
            "{err:?}"
        );
    }

    #[test]
    fn tests_total_overflow_is_an_error() {
        let max: &[u8] = b"<testsuite name=\"a\" tests=\"18446744073709551615\" failures=\"0\"/>";
        let one: &[u8] = b"<testsuite name=\"b\" tests=\"1\" failures=\"0\"/>";

        let err = merge_documents([max, one]).unwrap_err();
        match err {
            MergeError::CountOverflow { attribute, name } => {
                assert_eq!(attribute, "tests");
                assert_eq!(name, "b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_accumulate_leaves_report_unchanged() {
        let mut report = MergedReport::new();
        report.accumulate(suite("a", 1.0, 3, u64::MAX, "A")).unwrap();
        let before = report.clone();

        let err = report.accumulate(suite("b", 2.0, 1, 1, "B")).unwrap_err();
        assert!(
            matches!(
                err,
                MergeError::CountOverflow {
                    attribute: "failures",
                    ..
                }
            ),
            "{err:?}"
        );
        assert_eq!(report, before);
    }

    #[test]
    fn counts_up_to_the_maximum_are_accepted() {
        let mut report = MergedReport::new();
        report
            .accumulate_all([
                suite("a", 0.0, u64::MAX - 1, 0, ""),
                suite("b", 0.0, 1, 0, ""),
            ])
            .unwrap();
        assert_eq!(report.tests(), u64::MAX);
    }

    #[test]
    fn merge_of_single_document_preserves_fields() {
        let input: &[u8] = br#"<testsuite name="only" time="0.125" tests="9" failures="4">
  <testcase name="c"/>
</testsuite>"#;
        let report = merge_documents([input]).unwrap();
        assert_eq!(report.name(), "only");
        assert_eq!(report.time(), 0.125);
        assert_eq!(report.tests(), 9);
        assert_eq!(report.failures(), 4);
        assert_eq!(report.content(), "\n  <testcase name=\"c\"/>\n");
    }
}
