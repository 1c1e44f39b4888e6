// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Finds out whether a selection sits inside a given element.

use crate::selection::{AncestorNode, Selection};

/// The nearest node, starting at the selection's common ancestor and walking
/// outward, that is an element named `tag_name` (ASCII case-insensitive).
pub fn find_enclosing<'a>(
    selection: &'a Selection,
    tag_name: &str,
) -> Option<&'a AncestorNode> {
    selection.common_ancestor()?.ancestors().find(|node| {
        node.tag_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(tag_name))
    })
}

/// Whether the selection is nested inside a `tag_name` element. A selection
/// without a common ancestor is never enclosed.
pub fn is_enclosed(selection: &Selection, tag_name: &str) -> bool {
    find_enclosing(selection, tag_name).is_some()
}
