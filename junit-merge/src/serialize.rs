// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `MergedReport`.

use crate::MergedReport;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io;

static TESTSUITE_TAG: &str = "testsuite";

pub(crate) fn serialize_report(
    report: &MergedReport,
    writer: impl io::Write,
) -> quick_xml::Result<()> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_testsuite(report, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()
}

fn serialize_testsuite(
    report: &MergedReport,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut testsuite_tag = BytesStart::new(TESTSUITE_TAG);
    testsuite_tag.extend_attributes([
        ("name", report.name()),
        ("time", serialize_time(report.time()).as_str()),
        ("tests", report.tests().to_string().as_str()),
        ("failures", report.failures().to_string().as_str()),
    ]);

    let content = report.content();
    if content.is_empty() {
        return writer.write_event(Event::Empty(testsuite_tag));
    }

    writer.write_event(Event::Start(testsuite_tag))?;
    // The content is already-serialized markup, so it must be written without escaping.
    writer.write_event(Event::Text(BytesText::from_escaped(content)))?;
    writer.write_event(Event::End(BytesEnd::new(TESTSUITE_TAG)))
}

// Serialize time as the shortest decimal that round-trips, e.g. "3.5" or "1".
fn serialize_time(time: f64) -> String {
    format!("{time}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SuiteFragment;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(0.0, "0" ; "zero")]
    #[test_case(1.0, "1" ; "whole")]
    #[test_case(3.5, "3.5" ; "fraction")]
    #[test_case(0.125, "0.125" ; "small")]
    fn time_format(time: f64, expected: &str) {
        assert_eq!(serialize_time(time), expected);
    }

    #[test]
    fn empty_report_is_self_closing() {
        let output = MergedReport::new().to_string().unwrap();
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <testsuite name=\"\" time=\"0\" tests=\"0\" failures=\"0\"/>\n"
        );
    }

    #[test]
    fn content_is_written_verbatim() {
        let mut report = MergedReport::new();
        report
            .accumulate(SuiteFragment::new(
                "a",
                1.0,
                2,
                0,
                "<testcase name=\"a&amp;b\"/>",
            ))
            .unwrap()
            .accumulate(SuiteFragment::new(
                "b",
                2.5,
                3,
                1,
                "<testcase name=\"c\"><failure/></testcase>",
            ))
            .unwrap();

        assert_eq!(
            report.to_string().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <testsuite name=\"b\" time=\"3.5\" tests=\"5\" failures=\"1\">\
             <testcase name=\"a&amp;b\"/><testcase name=\"c\"><failure/></testcase>\
             </testsuite>\n"
        );
    }

    #[test]
    fn name_is_escaped() {
        let mut report = MergedReport::new();
        report
            .accumulate(SuiteFragment::new("a & b", 0.0, 0, 0, ""))
            .unwrap();
        let output = report.to_string().unwrap();
        assert!(output.contains("name=\"a &amp; b\""), "{output}");
    }

    #[test]
    fn serializing_twice_is_byte_identical() {
        let mut report = MergedReport::new();
        report
            .accumulate(SuiteFragment::new("x", 0.1, 1, 0, "\n  <testcase/>\n"))
            .unwrap();
        let first = report.to_string().unwrap();
        let second = report.to_string().unwrap();
        assert_eq!(first, second);
        assert_eq!(report.finalize().unwrap(), first);
    }
}
