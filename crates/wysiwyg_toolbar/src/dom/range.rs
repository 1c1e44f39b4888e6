// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Range queries and edits on a [`Dom`]. A range is a pair of UTF-16
//! offsets `[start, end)` into the plain text of the document.

use widestring::Utf16String;

use super::nodes::utf16_slice;
use super::{ContainerNode, Dom, DomHandle, DomNode, ToHtml};

impl Dom {
    /// The deepest node containing every text node that `[start, end)`
    /// overlaps. `None` when the range is collapsed or covers no text.
    pub fn common_ancestor_of_range(
        &self,
        start: usize,
        end: usize,
    ) -> Option<DomHandle> {
        let mut leaves = self.text_leaves_in(start, end).into_iter();
        let first = leaves.next()?.handle;
        Some(leaves.fold(first, |acc, leaf| acc.common_ancestor(&leaf.handle)))
    }

    pub fn plain_text_in(&self, start: usize, end: usize) -> String {
        let text = Utf16String::from_str(&self.to_plain_text());
        utf16_slice(&text, start, end).to_string()
    }

    /// Whether the text inside `[start, end)` sits in more than one block.
    /// Text directly under the document counts as one block of its own.
    pub fn range_crosses_blocks(&self, start: usize, end: usize) -> bool {
        let mut blocks = self
            .text_leaves_in(start, end)
            .into_iter()
            .map(|leaf| self.enclosing_block(&leaf.handle));
        let Some(first) = blocks.next() else {
            return false;
        };
        blocks.any(|block| block != first)
    }

    fn enclosing_block(&self, handle: &DomHandle) -> DomHandle {
        let mut current = handle.parent_handle();
        while let Some(h) = current {
            let is_block = self
                .lookup_node(&h)
                .and_then(DomNode::as_container)
                .is_some_and(ContainerNode::is_block);
            if is_block {
                return h;
            }
            current = h.parent_handle();
        }
        DomHandle::root()
    }

    /// Serialize the contents of `[start, end)` below its common ancestor.
    /// Elements only partly inside the range are cut down to the part that
    /// is.
    pub fn fragment_to_html(&self, start: usize, end: usize) -> String {
        let Some(handle) = self.common_ancestor_of_range(start, end) else {
            return String::new();
        };
        let location = self.location_of(&handle);
        match self.lookup_node(&handle) {
            Some(DomNode::Text(t)) => {
                let text = utf16_slice(
                    t.data(),
                    start.saturating_sub(location),
                    end - location,
                );
                DomNode::new_text(text).to_html()
            }
            Some(DomNode::Container(c)) => {
                clip(c.children(), location, start, end).to_html()
            }
            None => String::new(),
        }
    }

    /// Unwrap every element matching `is_target` that overlaps
    /// `[start, end)`. Elements that stick out of the range are split so
    /// that only the selected part loses its markup.
    pub fn remove_formatting<F>(&mut self, start: usize, end: usize, is_target: F)
    where
        F: Fn(&ContainerNode) -> bool,
    {
        if start >= end {
            return;
        }
        let children = std::mem::take(self.document_mut().children_mut());
        let children = unwrap_in(children, 0, start, end, &is_target);
        self.document_mut().set_children(children);
        self.normalize();
    }

    /// Wrap the inline content of `[start, end)` in one `name` element per
    /// block. Inline elements only partly inside the range are split at its
    /// edges. `name` elements inside the range are lifted into the new one,
    /// and it absorbs `name` elements directly next to it.
    pub fn wrap_text_in(&mut self, start: usize, end: usize, name: &str) {
        if start >= end {
            return;
        }
        let children = std::mem::take(self.document_mut().children_mut());
        let children = wrap_in(children, 0, start, end, name);
        self.document_mut().set_children(children);
        self.normalize();
    }

    /// Delete the text inside `[start, end)` and put `new_nodes` where it
    /// started.
    pub fn replace_range_with(
        &mut self,
        start: usize,
        end: usize,
        new_nodes: Vec<DomNode>,
    ) {
        self.split_text_at(start);
        self.split_text_at(end);

        let selected = self.text_leaves_in(start, end);
        let (parent, index) = match selected.first() {
            Some(first) => {
                for leaf in selected.iter().rev() {
                    self.remove_node(&leaf.handle);
                }
                (
                    first.handle.parent_handle().unwrap_or_default(),
                    first.handle.index_in_parent().unwrap_or(0),
                )
            }
            None => self.insertion_point(start),
        };

        if let Some(container) = self.lookup_container_mut(&parent) {
            let at = index.min(container.children().len());
            container.children_mut().splice(at..at, new_nodes);
        }
        self.normalize();
    }

    /// Make `offset` fall on a text node boundary.
    pub(crate) fn split_text_at(&mut self, offset: usize) {
        let Some(leaf) = self
            .text_leaves()
            .into_iter()
            .find(|leaf| leaf.start < offset && offset < leaf.end())
        else {
            return;
        };
        let (Some(parent), Some(index)) =
            (leaf.handle.parent_handle(), leaf.handle.index_in_parent())
        else {
            return;
        };
        let Some(container) = self.lookup_container_mut(&parent) else {
            return;
        };
        let node = container.children_mut().remove(index);
        let (before, after) = node.split_at_offset(offset - leaf.start);
        let parts: Vec<DomNode> = before.into_iter().chain(after).collect();
        container.children_mut().splice(index..index, parts);
    }

    pub(crate) fn remove_node(&mut self, handle: &DomHandle) {
        let (Some(parent), Some(index)) =
            (handle.parent_handle(), handle.index_in_parent())
        else {
            return;
        };
        if let Some(container) = self.lookup_container_mut(&parent) {
            if index < container.children().len() {
                container.children_mut().remove(index);
            }
        }
    }

    /// Where a node inserted at `offset` goes when no text is selected:
    /// after the text ending at `offset`, else before the text starting
    /// there, else at the end of the innermost last container.
    fn insertion_point(&self, offset: usize) -> (DomHandle, usize) {
        let leaves = self.text_leaves();
        let slot = leaves
            .iter()
            .find(|leaf| leaf.end() == offset)
            .map(|leaf| (leaf, 1))
            .or_else(|| {
                leaves
                    .iter()
                    .find(|leaf| leaf.start == offset)
                    .map(|leaf| (leaf, 0))
            });
        if let Some((leaf, shift)) = slot {
            if let (Some(parent), Some(index)) =
                (leaf.handle.parent_handle(), leaf.handle.index_in_parent())
            {
                return (parent, index + shift);
            }
        }

        let mut handle = DomHandle::root();
        let mut container = self.document();
        while let Some(DomNode::Container(last)) = container.children().last()
        {
            if last.is_void() {
                break;
            }
            handle = handle.child_handle(container.children().len() - 1);
            container = last;
        }
        (handle, container.children().len())
    }

    /// Merge adjacent text nodes, drop empty text nodes and drop
    /// formatting elements left without children.
    pub fn normalize(&mut self) {
        normalize_container(self.document_mut());
    }
}

fn clip(nodes: &[DomNode], pos: usize, start: usize, end: usize) -> Vec<DomNode> {
    let mut out = Vec::new();
    let mut pos = pos;
    for node in nodes {
        let len = node.text_len();
        match node {
            DomNode::Text(t) => {
                if pos < end && pos + len > start {
                    let text = utf16_slice(
                        t.data(),
                        start.saturating_sub(pos),
                        end.min(pos + len) - pos,
                    );
                    out.push(DomNode::new_text(text));
                }
            }
            DomNode::Container(c) => {
                if len == 0 {
                    if start < pos && pos < end {
                        out.push(node.clone());
                    }
                } else if pos < end && pos + len > start {
                    let mut copy = c.shallow_clone();
                    copy.set_children(clip(c.children(), pos, start, end));
                    out.push(DomNode::Container(copy));
                }
            }
        }
        pos += len;
    }
    out
}

fn unwrap_in(
    nodes: Vec<DomNode>,
    pos: usize,
    start: usize,
    end: usize,
    is_target: &dyn Fn(&ContainerNode) -> bool,
) -> Vec<DomNode> {
    let mut out = Vec::new();
    let mut pos = pos;
    for node in nodes {
        let len = node.text_len();
        let overlaps = pos < end && pos + len > start;
        match node {
            DomNode::Container(c) if overlaps && is_target(&c) => {
                let inner_start = start.max(pos);
                let inner_end = end.min(pos + len);
                let (before, rest) = c.split_at_offset(inner_start - pos);
                let (middle, after) =
                    rest.split_at_offset(inner_end - inner_start);
                if !before.children().is_empty() {
                    out.push(DomNode::Container(before));
                }
                out.extend(unwrap_in(
                    middle.take_children(),
                    inner_start,
                    start,
                    end,
                    is_target,
                ));
                if !after.children().is_empty() {
                    out.push(DomNode::Container(after));
                }
            }
            DomNode::Container(mut c) if overlaps => {
                let children = std::mem::take(c.children_mut());
                c.set_children(unwrap_in(children, pos, start, end, is_target));
                out.push(DomNode::Container(c));
            }
            node => out.push(node),
        }
        pos += len;
    }
    out
}

fn wrap_in(
    nodes: Vec<DomNode>,
    pos: usize,
    start: usize,
    end: usize,
    name: &str,
) -> Vec<DomNode> {
    let mut out: Vec<DomNode> = Vec::new();
    let mut pos = pos;
    for node in nodes {
        let len = node.text_len();
        let overlaps = pos < end && pos + len > start;
        match node {
            DomNode::Container(mut c)
                if overlaps && (c.is_block() || contains_block(&c)) =>
            {
                let children = std::mem::take(c.children_mut());
                c.set_children(wrap_in(children, pos, start, end, name));
                out.push(DomNode::Container(c));
            }
            node if overlaps => {
                let inner_start = start.max(pos);
                let inner_end = end.min(pos + len);
                let (before, rest) = node.split_at_offset(inner_start - pos);
                let (middle, after) = match rest {
                    Some(rest) => rest.split_at_offset(inner_end - inner_start),
                    None => (None, None),
                };
                if let Some(before) = before {
                    push_merging(&mut out, before, name);
                }
                if let Some(middle) = middle {
                    let lifted = lift_named(middle, name);
                    push_merging(
                        &mut out,
                        DomNode::Container(ContainerNode::new(
                            name,
                            Vec::new(),
                            lifted,
                        )),
                        name,
                    );
                }
                if let Some(after) = after {
                    push_merging(&mut out, after, name);
                }
            }
            // Zero-length nodes between two wrapped runs stay inside
            node if len == 0 && start < pos && pos < end => {
                match wrapper_mut(out.last_mut(), name) {
                    Some(wrapper) => wrapper.children_mut().push(node),
                    None => out.push(node),
                }
            }
            node => push_merging(&mut out, node, name),
        }
        pos += len;
    }
    out
}

fn contains_block(container: &ContainerNode) -> bool {
    container
        .children()
        .iter()
        .filter_map(DomNode::as_container)
        .any(|c| c.is_block() || contains_block(c))
}

/// A bare `name` element, one that can absorb neighbouring content.
fn wrapper_mut<'a>(
    node: Option<&'a mut DomNode>,
    name: &str,
) -> Option<&'a mut ContainerNode> {
    match node {
        Some(DomNode::Container(c))
            if c.name() == name && c.attributes().is_empty() =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// Push `node`, folding it into the previous node when both are bare
/// `name` elements.
fn push_merging(out: &mut Vec<DomNode>, mut node: DomNode, name: &str) {
    if wrapper_mut(Some(&mut node), name).is_some() {
        if let Some(previous) = wrapper_mut(out.last_mut(), name) {
            if let DomNode::Container(c) = node {
                previous.children_mut().extend(c.take_children());
            }
            return;
        }
    }
    out.push(node);
}

/// Replace every `name` element in `node` by its children.
fn lift_named(node: DomNode, name: &str) -> Vec<DomNode> {
    match node {
        DomNode::Container(c) if c.name() == name => c
            .take_children()
            .into_iter()
            .flat_map(|child| lift_named(child, name))
            .collect(),
        DomNode::Container(mut c) => {
            let children = std::mem::take(c.children_mut());
            c.set_children(
                children
                    .into_iter()
                    .flat_map(|child| lift_named(child, name))
                    .collect(),
            );
            vec![DomNode::Container(c)]
        }
        text => vec![text],
    }
}

fn normalize_container(container: &mut ContainerNode) {
    let children = std::mem::take(container.children_mut());
    let mut out: Vec<DomNode> = Vec::with_capacity(children.len());
    for mut child in children {
        match &mut child {
            DomNode::Text(t) => {
                if t.data().is_empty() {
                    continue;
                }
                if let Some(DomNode::Text(previous)) = out.last_mut() {
                    previous.push_utfstr(t.data());
                    continue;
                }
            }
            DomNode::Container(c) => {
                normalize_container(c);
                if c.is_formatting() && c.children().is_empty() {
                    continue;
                }
            }
        }
        out.push(child);
    }
    container.set_children(out);
}
