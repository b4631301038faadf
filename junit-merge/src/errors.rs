// Copyright (c) The junit-merger Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use quick_xml::events::attributes::AttrError;
use std::string::FromUtf8Error;
use thiserror::Error;

/// An error that occurs while parsing a JUnit document into suite fragments.
///
/// Returned by [`parse`](crate::parse) and [`merge_documents`](crate::merge_documents).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The document had no root element: it was empty, whitespace-only, or contained only a
    /// declaration or comments.
    #[error("document has no root element")]
    NoRootElement,

    /// The root element was neither `<testsuite>` nor `<testsuites>`.
    #[error("unrecognized root element <{name}> (expected <testsuite> or <testsuites>)")]
    UnrecognizedRoot {
        /// The name of the root element, as written.
        name: String,
    },

    /// A `<testsuite>` embedded in a `<testsuites>` collection could not be parsed.
    #[error("testsuite at index {index} of <testsuites> is malformed")]
    MalformedFragment {
        /// The zero-based index of the suite within the collection.
        index: usize,

        /// The underlying error.
        #[source]
        err: Box<ParseError>,
    },

    /// The document ended before the root element was closed.
    #[error("document ended before </{name}> was found")]
    UnclosedRoot {
        /// The name of the root element, as written.
        name: String,
    },

    /// Another element was found after the root element closed.
    #[error("unexpected element <{name}> after the root element")]
    TrailingContent {
        /// The name of the trailing element.
        name: String,
    },

    /// An attribute on a `<testsuite>` could not be read.
    #[error("invalid attribute on <testsuite>")]
    Attribute {
        /// The underlying error.
        #[source]
        err: AttrError,
    },

    /// A numeric attribute on a `<testsuite>` had a value that could not be parsed.
    #[error("invalid value `{value}` for attribute `{attribute}`")]
    InvalidAttribute {
        /// The attribute name.
        attribute: &'static str,

        /// The value, as written.
        value: String,
    },

    /// The document is not well-formed XML.
    #[error("malformed XML at byte offset {position}")]
    Xml {
        /// The byte offset the reader had reached when the error occurred.
        position: usize,

        /// The underlying error.
        #[source]
        err: quick_xml::Error,
    },
}

impl ParseError {
    pub(crate) fn malformed_fragment(index: usize, err: ParseError) -> Self {
        Self::MalformedFragment {
            index,
            err: Box::new(err),
        }
    }

    pub(crate) fn xml(position: usize, err: quick_xml::Error) -> Self {
        Self::Xml { position, err }
    }
}

/// An error that occurs while folding suite fragments into a [`MergedReport`](crate::MergedReport).
///
/// Returned by [`MergedReport::accumulate`](crate::MergedReport::accumulate),
/// [`MergedReport::accumulate_all`](crate::MergedReport::accumulate_all) and
/// [`merge_documents`](crate::merge_documents).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MergeError {
    /// A document passed to [`merge_documents`](crate::merge_documents) could not be parsed.
    #[error("document at index {index} could not be parsed")]
    Parse {
        /// The zero-based index of the document.
        index: usize,

        /// The underlying error.
        #[source]
        err: ParseError,
    },

    /// Adding a fragment's count to the running total exceeded `u64::MAX`.
    #[error("total `{attribute}` overflowed while merging testsuite `{name}`")]
    CountOverflow {
        /// The attribute whose total overflowed: `tests` or `failures`.
        attribute: &'static str,

        /// The name of the fragment that caused the overflow.
        name: String,
    },
}

/// An error that occurs while serializing a [`MergedReport`](crate::MergedReport).
///
/// Returned by [`MergedReport::serialize`](crate::MergedReport::serialize),
/// [`MergedReport::to_string`](crate::MergedReport::to_string) and
/// [`MergedReport::finalize`](crate::MergedReport::finalize).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// An error occurred while writing XML.
    #[error("error serializing merged JUnit report")]
    Xml {
        /// The underlying error.
        #[from]
        err: quick_xml::Error,
    },

    /// The serialized output was not valid UTF-8.
    #[error("serialized merged JUnit report is not valid UTF-8")]
    Utf8 {
        /// The underlying error.
        #[from]
        err: FromUtf8Error,
    },
}
