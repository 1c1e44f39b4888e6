// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The in-memory document behind [`crate::HtmlRegion`].

pub mod dom_handle;
pub mod nodes;
pub mod parser;
mod range;
mod to_html;

pub use dom_handle::DomHandle;
pub use nodes::{ContainerNode, DomNode, TextNode};
pub use to_html::ToHtml;

/// A text node together with where it sits in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLeaf {
    pub handle: DomHandle,
    pub start: usize,
    pub len: usize,
}

impl TextLeaf {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dom {
    document: DomNode,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Dom {
    pub fn new(children: Vec<DomNode>) -> Self {
        Self {
            document: DomNode::Container(ContainerNode::new_document(
                children,
            )),
        }
    }

    pub fn document(&self) -> &ContainerNode {
        match &self.document {
            DomNode::Container(c) => c,
            DomNode::Text(_) => unreachable!("document is always a container"),
        }
    }

    pub fn document_mut(&mut self) -> &mut ContainerNode {
        match &mut self.document {
            DomNode::Container(c) => c,
            DomNode::Text(_) => unreachable!("document is always a container"),
        }
    }

    pub fn document_node(&self) -> &DomNode {
        &self.document
    }

    pub fn text_len(&self) -> usize {
        self.document.text_len()
    }

    pub fn to_plain_text(&self) -> String {
        self.document.to_plain_text()
    }

    pub fn lookup_node(&self, handle: &DomHandle) -> Option<&DomNode> {
        let mut node = &self.document;
        for index in handle.raw() {
            node = node.as_container()?.children().get(*index)?;
        }
        Some(node)
    }

    pub fn lookup_node_mut(
        &mut self,
        handle: &DomHandle,
    ) -> Option<&mut DomNode> {
        let mut node = &mut self.document;
        for index in handle.raw() {
            node = node.as_container_mut()?.children_mut().get_mut(*index)?;
        }
        Some(node)
    }

    pub fn lookup_container_mut(
        &mut self,
        handle: &DomHandle,
    ) -> Option<&mut ContainerNode> {
        self.lookup_node_mut(handle)?.as_container_mut()
    }

    /// Offset of the first text position inside the node at `handle`.
    pub fn location_of(&self, handle: &DomHandle) -> usize {
        let mut location = 0;
        let mut node = &self.document;
        for index in handle.raw() {
            let Some(container) = node.as_container() else {
                break;
            };
            location += container
                .children()
                .iter()
                .take(*index)
                .map(DomNode::text_len)
                .sum::<usize>();
            match container.children().get(*index) {
                Some(child) => node = child,
                None => break,
            }
        }
        location
    }

    /// Every text node in document order, with its position.
    pub fn text_leaves(&self) -> Vec<TextLeaf> {
        fn collect(
            node: &DomNode,
            handle: DomHandle,
            pos: &mut usize,
            out: &mut Vec<TextLeaf>,
        ) {
            match node {
                DomNode::Text(t) => {
                    out.push(TextLeaf {
                        handle,
                        start: *pos,
                        len: t.text_len(),
                    });
                    *pos += t.text_len();
                }
                DomNode::Container(c) => {
                    for (i, child) in c.children().iter().enumerate() {
                        collect(child, handle.child_handle(i), pos, out);
                    }
                }
            }
        }

        let mut out = Vec::new();
        let mut pos = 0;
        collect(&self.document, DomHandle::root(), &mut pos, &mut out);
        out
    }

    /// Text nodes that share at least one code unit with `[start, end)`.
    /// Empty for a collapsed range.
    pub fn text_leaves_in(&self, start: usize, end: usize) -> Vec<TextLeaf> {
        if start >= end {
            return Vec::new();
        }
        self.text_leaves()
            .into_iter()
            .filter(|leaf| leaf.start < end && leaf.end() > start)
            .collect()
    }

    /// The node at `handle` and all its ancestors, innermost first,
    /// stopping before the document node.
    pub fn ancestors_of(&self, handle: &DomHandle) -> Vec<&DomNode> {
        let mut ancestors: Vec<&DomNode> = handle
            .with_ancestors()
            .iter()
            .filter(|h| !h.is_root())
            .filter_map(|h| self.lookup_node(h))
            .collect();
        ancestors.reverse();
        ancestors
    }

    /// Panics if the tree contains empty or adjacent text nodes.
    pub fn explicitly_assert_invariants(&self) {
        fn check(node: &DomNode) {
            if let DomNode::Container(c) = node {
                let mut previous_was_text = false;
                for child in c.children() {
                    if let DomNode::Text(t) = child {
                        assert!(!t.data().is_empty(), "empty text node");
                        assert!(!previous_was_text, "adjacent text nodes");
                        previous_was_text = true;
                    } else {
                        previous_was_text = false;
                    }
                    check(child);
                }
            }
        }
        check(&self.document);
    }

    pub(crate) fn assert_invariants(&self) {
        #[cfg(feature = "assert-invariants")]
        self.explicitly_assert_invariants();
    }
}
