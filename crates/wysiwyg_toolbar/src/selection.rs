// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Immutable snapshots of a region's selection.

/// One node on the path from a selection's common ancestor out to the
/// editable region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AncestorNode {
    Text,
    Element(String),
}

impl AncestorNode {
    pub fn element(name: &str) -> Self {
        Self::Element(name.to_owned())
    }

    /// The element name, `None` for text nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::Text => None,
            Self::Element(name) => Some(name),
        }
    }
}

/// The nearest node containing the whole selection, together with its
/// ancestors up to (not including) the region root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommonAncestor {
    chain: Vec<AncestorNode>,
}

impl CommonAncestor {
    /// `chain` starts at the common ancestor itself and walks outward.
    pub fn new(chain: Vec<AncestorNode>) -> Self {
        Self { chain }
    }

    /// The common ancestor followed by its ancestors, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &AncestorNode> {
        self.chain.iter()
    }

    /// The common ancestor itself; `None` when it is the region root.
    pub fn node(&self) -> Option<&AncestorNode> {
        self.chain.first()
    }
}

/// What was selected at the moment the snapshot was taken. Never cached:
/// every query asks the region for a new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    text: String,
    html: String,
    common_ancestor: Option<CommonAncestor>,
}

impl Selection {
    pub fn new(
        text: impl Into<String>,
        html: impl Into<String>,
        common_ancestor: Option<CommonAncestor>,
    ) -> Self {
        Self {
            text: text.into(),
            html: html.into(),
            common_ancestor,
        }
    }

    /// A selection with nothing in it.
    pub fn collapsed() -> Self {
        Self::default()
    }

    /// Plain text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Serialized markup of the selected content.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Absent for collapsed selections and selections that cross the
    /// region boundary.
    pub fn common_ancestor(&self) -> Option<&CommonAncestor> {
        self.common_ancestor.as_ref()
    }

    pub fn is_collapsed(&self) -> bool {
        self.text.is_empty() && self.html.is_empty()
    }
}
