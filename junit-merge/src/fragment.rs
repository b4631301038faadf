// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse JUnit documents into suite fragments.

use crate::errors::ParseError;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::fmt;
use tracing::{debug, trace};

static TESTSUITES_TAG: &[u8] = b"testsuites";
static TESTSUITE_TAG: &[u8] = b"testsuite";

/// One `<testsuite>`'s contribution to a merge.
///
/// Fragments are produced by [`parse`]. The numeric fields are additive across fragments, while
/// `inner_content` is kept exactly as it was written in the source document.
#[derive(Clone, Debug, PartialEq)]
pub struct SuiteFragment {
    name: String,
    time: f64,
    tests: u64,
    failures: u64,
    inner_content: String,
}

impl SuiteFragment {
    /// Creates a new fragment from its parts.
    pub fn new(
        name: impl Into<String>,
        time: f64,
        tests: u64,
        failures: u64,
        inner_content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            time,
            tests,
            failures,
            inner_content: inner_content.into(),
        }
    }

    /// The value of the suite's `name` attribute, or the empty string if it was missing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the suite's `time` attribute in seconds, or 0 if it was missing.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The value of the suite's `tests` attribute, or 0 if it was missing.
    pub fn tests(&self) -> u64 {
        self.tests
    }

    /// The value of the suite's `failures` attribute, or 0 if it was missing.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// The raw markup between the suite's start and end tags.
    pub fn inner_content(&self) -> &str {
        &self.inner_content
    }
}

/// The shape of a JUnit document, determined by its root element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// The root element is a `<testsuite>`.
    SingleSuite,

    /// The root element is a `<testsuites>` wrapping zero or more `<testsuite>` elements.
    SuiteCollection,
}

impl DocumentKind {
    /// Determines the document kind from the local name of its root element.
    ///
    /// Returns `None` for any other name.
    pub fn from_root_name(local_name: &[u8]) -> Option<Self> {
        if local_name == TESTSUITE_TAG {
            Some(Self::SingleSuite)
        } else if local_name == TESTSUITES_TAG {
            Some(Self::SuiteCollection)
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleSuite => write!(f, "single testsuite"),
            Self::SuiteCollection => write!(f, "testsuites collection"),
        }
    }
}

/// The result of [`parse`]: the document's kind and the fragments it contains, in document order.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedDocument {
    /// The shape of the document.
    pub kind: DocumentKind,

    /// The fragments extracted from the document.
    ///
    /// A single-suite document always has exactly one fragment. A collection has one fragment
    /// per embedded `<testsuite>`, possibly none.
    pub fragments: Vec<SuiteFragment>,
}

impl ParsedDocument {
    /// Consumes `self`, returning the fragments.
    pub fn into_fragments(self) -> Vec<SuiteFragment> {
        self.fragments
    }
}

/// Parses a JUnit document into an ordered list of suite fragments.
///
/// The document's root must be either `<testsuite>` or `<testsuites>`. Direct children of a
/// `<testsuites>` root that aren't `<testsuite>` elements are skipped.
pub fn parse(bytes: &[u8]) -> Result<ParsedDocument, ParseError> {
    let mut reader = Reader::from_reader(bytes);

    let (root, is_empty) = loop {
        match read_event(&mut reader)? {
            Event::Start(start) => break (start, false),
            Event::Empty(start) => break (start, true),
            Event::Eof => return Err(ParseError::NoRootElement),
            // Declarations, comments, processing instructions, doctypes and whitespace.
            _ => {}
        }
    };

    let kind = DocumentKind::from_root_name(root.local_name().as_ref()).ok_or_else(|| {
        ParseError::UnrecognizedRoot {
            name: element_name(&root),
        }
    })?;

    let fragments = match (kind, is_empty) {
        (DocumentKind::SingleSuite, _) => vec![read_suite(&mut reader, &root, is_empty)?],
        (DocumentKind::SuiteCollection, true) => vec![],
        (DocumentKind::SuiteCollection, false) => read_collection(&mut reader, &root)?,
    };

    check_trailing(&mut reader)?;

    debug!(%kind, fragments = fragments.len(), "parsed JUnit document");
    Ok(ParsedDocument { kind, fragments })
}

fn read_collection<'a>(
    reader: &mut Reader<&'a [u8]>,
    root: &BytesStart<'a>,
) -> Result<Vec<SuiteFragment>, ParseError> {
    let mut fragments = vec![];

    loop {
        match read_event(reader)? {
            Event::Start(start) if is_suite(&start) => {
                let index = fragments.len();
                let fragment = read_suite(reader, &start, false)
                    .map_err(|err| ParseError::malformed_fragment(index, err))?;
                fragments.push(fragment);
            }
            Event::Empty(start) if is_suite(&start) => {
                let index = fragments.len();
                let fragment = read_suite(reader, &start, true)
                    .map_err(|err| ParseError::malformed_fragment(index, err))?;
                fragments.push(fragment);
            }
            Event::Start(other) => {
                debug!(element = %element_name(&other), "skipping non-testsuite element in <testsuites>");
                let position = reader.buffer_position();
                reader
                    .read_to_end(other.name())
                    .map_err(|err| ParseError::xml(position, err))?;
            }
            Event::Empty(other) => {
                debug!(element = %element_name(&other), "skipping non-testsuite element in <testsuites>");
            }
            // The reader checks end names, so this is the root's end tag.
            Event::End(_) => return Ok(fragments),
            Event::Eof => {
                return Err(ParseError::UnclosedRoot {
                    name: element_name(root),
                })
            }
            _ => {}
        }
    }
}

fn read_suite<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'a>,
    is_empty: bool,
) -> Result<SuiteFragment, ParseError> {
    let position = reader.buffer_position();
    let mut fragment = SuiteFragment::new("", 0.0, 0, 0, "");

    for attr in start.attributes() {
        let attr = attr.map_err(|err| ParseError::Attribute { err })?;
        let value = attr
            .unescape_value()
            .map_err(|err| ParseError::xml(position, err))?;

        match attr.key.local_name().as_ref() {
            b"name" => fragment.name = value.into_owned(),
            b"time" => fragment.time = parse_number("time", &value)?,
            b"tests" => fragment.tests = parse_number("tests", &value)?,
            b"failures" => fragment.failures = parse_number("failures", &value)?,
            _ => {}
        }
    }

    if !is_empty {
        fragment.inner_content = reader
            .read_text(start.name())
            .map_err(|err| ParseError::xml(position, err))?
            .into_owned();
    }

    trace!(
        name = %fragment.name,
        tests = fragment.tests,
        failures = fragment.failures,
        "read testsuite"
    );
    Ok(fragment)
}

/// Ensures that nothing but whitespace, comments and processing instructions follow the root.
fn check_trailing(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    loop {
        match read_event(reader)? {
            Event::Start(start) | Event::Empty(start) => {
                return Err(ParseError::TrailingContent {
                    name: element_name(&start),
                })
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn read_event<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>, ParseError> {
    let position = reader.buffer_position();
    reader
        .read_event()
        .map_err(|err| ParseError::xml(position, err))
}

fn parse_number<T: std::str::FromStr>(attribute: &'static str, value: &str) -> Result<T, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidAttribute {
            attribute,
            value: value.to_owned(),
        })
}

fn is_suite(start: &BytesStart<'_>) -> bool {
    start.local_name().as_ref() == TESTSUITE_TAG
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}
