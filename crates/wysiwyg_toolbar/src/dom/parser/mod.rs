// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

mod padom;
mod padom_creator;
mod parse;

use html5ever::{namespace_url, ns, LocalName, QualName};
use thiserror::Error;

use padom::PaDom;
pub(crate) use padom_creator::PaDomCreator;
pub use parse::{parse, parse_lenient, strip_meta_tags};

/// Errors html5ever reported while parsing markup.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("failed to parse HTML: {}", parse_errors.join("; "))]
pub struct HtmlParseError {
    pub parse_errors: Vec<String>,
}

/// The parser state: the document built so far plus any errors seen. Also
/// returned as the error value so callers can recover the partial tree.
#[derive(Clone, Debug)]
pub(crate) struct PaDomCreationError {
    pub(crate) dom: PaDom,
    pub(crate) parse_errors: Vec<String>,
}

impl PaDomCreationError {
    pub(crate) fn new() -> Self {
        Self {
            dom: PaDom::new(),
            parse_errors: Vec::new(),
        }
    }
}

pub(crate) fn paqual_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}
