// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Owned document nodes. Parents own their children; text is held as
//! UTF-16 so lengths and offsets are code units, as on the platforms the
//! editor runs on.

use widestring::{Utf16Str, Utf16String};

/// Elements that never have children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "source", "track", "wbr",
];

/// Inline elements that a "remove formatting" command strips.
const FORMATTING_ELEMENTS: &[&str] = &[
    "abbr", "acronym", "b", "bdi", "bdo", "big", "blink", "cite", "code",
    "del", "dfn", "em", "font", "i", "ins", "kbd", "mark", "nobr", "q", "s",
    "samp", "small", "span", "strike", "strong", "sub", "sup", "tt", "u",
    "var",
];

/// Elements that inline markup can never wrap.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol",
    "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th",
    "thead", "tr", "ul",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

pub fn is_formatting_element(name: &str) -> bool {
    FORMATTING_ELEMENTS.contains(&name)
}

pub fn is_block_element(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

/// The part of `s` between two offsets. Offsets falling inside a surrogate
/// pair move back to its start; offsets past the end clamp to the length.
pub fn utf16_slice(s: &Utf16Str, start: usize, end: usize) -> &Utf16Str {
    let end = char_boundary_before(s, end);
    let start = char_boundary_before(s, start).min(end);
    &s[start..end]
}

fn char_boundary_before(s: &Utf16Str, offset: usize) -> usize {
    (0..=offset.min(s.len()))
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomNode {
    Container(ContainerNode),
    Text(TextNode),
}

impl DomNode {
    pub fn new_text(data: impl Into<TextNode>) -> Self {
        Self::Text(data.into())
    }

    pub fn new_element(name: &str, children: Vec<DomNode>) -> Self {
        Self::Container(ContainerNode::new(name, Vec::new(), children))
    }

    pub fn text_len(&self) -> usize {
        match self {
            Self::Container(c) => c.text_len(),
            Self::Text(t) => t.text_len(),
        }
    }

    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Container(c) => c.to_plain_text(),
            Self::Text(t) => t.data().to_string(),
        }
    }

    pub fn is_text_node(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            Self::Container(c) => Some(c),
            Self::Text(_) => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut ContainerNode> {
        match self {
            Self::Container(c) => Some(c),
            Self::Text(_) => None,
        }
    }

    /// Name of the element, `None` for text nodes.
    pub fn name(&self) -> Option<&str> {
        self.as_container().map(ContainerNode::name)
    }

    /// Split this node at `offset`, returning the parts before and after it.
    /// Parts without content are dropped.
    pub(crate) fn split_at_offset(
        self,
        offset: usize,
    ) -> (Option<DomNode>, Option<DomNode>) {
        match self {
            Self::Text(t) => {
                let (before, after) = t.split_at_offset(offset);
                (
                    before.map(DomNode::Text),
                    after.map(DomNode::Text),
                )
            }
            Self::Container(c) => {
                let (before, after) = c.split_at_offset(offset);
                let keep = |c: ContainerNode| {
                    (!c.children.is_empty()).then_some(DomNode::Container(c))
                };
                (keep(before), keep(after))
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextNode {
    data: Utf16String,
}

impl TextNode {
    pub fn data(&self) -> &Utf16Str {
        &self.data
    }

    pub fn set_data(&mut self, data: Utf16String) {
        self.data = data;
    }

    pub fn push_utfstr(&mut self, data: &Utf16Str) {
        self.data.push_utfstr(data);
    }

    pub fn text_len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn split_at_offset(
        self,
        offset: usize,
    ) -> (Option<TextNode>, Option<TextNode>) {
        let len = self.data.len();
        let before = utf16_slice(&self.data, 0, offset);
        let after = utf16_slice(&self.data, before.len(), len);
        let keep =
            |s: &Utf16Str| (!s.is_empty()).then(|| TextNode::from(s));
        (keep(before), keep(after))
    }
}

impl From<Utf16String> for TextNode {
    fn from(data: Utf16String) -> Self {
        Self { data }
    }
}

impl From<&Utf16Str> for TextNode {
    fn from(data: &Utf16Str) -> Self {
        Self {
            data: data.to_owned(),
        }
    }
}

impl From<String> for TextNode {
    fn from(data: String) -> Self {
        Self::from(data.as_str())
    }
}

impl From<&str> for TextNode {
    fn from(data: &str) -> Self {
        Self {
            data: Utf16String::from_str(data),
        }
    }
}

/// An element, or the document node (which has an empty name).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerNode {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<DomNode>,
}

impl ContainerNode {
    pub fn new(
        name: &str,
        attrs: Vec<(String, String)>,
        children: Vec<DomNode>,
    ) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs,
            children,
        }
    }

    pub fn new_document(children: Vec<DomNode>) -> Self {
        Self::new("", Vec::new(), children)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_document(&self) -> bool {
        self.name.is_empty()
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    pub fn is_formatting(&self) -> bool {
        is_formatting_element(&self.name)
    }

    /// Block elements and the document itself.
    pub fn is_block(&self) -> bool {
        self.is_document() || is_block_element(&self.name)
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    pub fn set_attributes(&mut self, attrs: Vec<(String, String)>) {
        self.attrs = attrs;
    }

    pub fn children(&self) -> &[DomNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<DomNode> {
        &mut self.children
    }

    pub fn take_children(self) -> Vec<DomNode> {
        self.children
    }

    pub fn set_children(&mut self, children: Vec<DomNode>) {
        self.children = children;
    }

    pub fn text_len(&self) -> usize {
        self.children.iter().map(DomNode::text_len).sum()
    }

    pub fn to_plain_text(&self) -> String {
        self.children.iter().map(DomNode::to_plain_text).collect()
    }

    /// A copy of this element with no children.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            children: Vec::new(),
        }
    }

    /// Split into two copies of this element: one holding the content
    /// before `offset`, the other the content after it. Zero-length children
    /// sitting exactly on the boundary stay on the left.
    pub(crate) fn split_at_offset(
        self,
        offset: usize,
    ) -> (ContainerNode, ContainerNode) {
        let mut before = self.shallow_clone();
        let mut after = self.shallow_clone();
        let mut pos = 0;
        for child in self.children {
            let len = child.text_len();
            if pos + len <= offset {
                before.children.push(child);
            } else if pos >= offset {
                after.children.push(child);
            } else {
                let (left, right) = child.split_at_offset(offset - pos);
                before.children.extend(left);
                after.children.extend(right);
            }
            pos += len;
        }
        (before, after)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn el(name: &str, children: Vec<DomNode>) -> DomNode {
        DomNode::new_element(name, children)
    }

    fn tx(data: &str) -> DomNode {
        DomNode::new_text(data)
    }

    #[test]
    fn text_lengths_count_surrogate_pairs_twice() {
        assert_eq!(tx("abc").text_len(), 3);
        assert_eq!(tx("\u{1F4A9}").text_len(), 2);
    }

    #[test]
    fn slicing_never_cuts_a_surrogate_pair() {
        let s = Utf16String::from_str("a\u{1F4A9}b");
        assert_eq!(utf16_slice(&s, 1, 3).to_string(), "\u{1F4A9}");
        assert_eq!(utf16_slice(&s, 2, 4).to_string(), "\u{1F4A9}b");
        assert_eq!(utf16_slice(&s, 1, 2).to_string(), "");
        let abc = Utf16String::from_str("abc");
        assert_eq!(utf16_slice(&abc, 2, 10).to_string(), "c");
    }

    #[test]
    fn splitting_text_inside_a_surrogate_pair_keeps_it_whole() {
        let (before, after) = TextNode::from("a\u{1F4A9}").split_at_offset(2);
        assert_eq!(before, Some(TextNode::from("a")));
        assert_eq!(after, Some(TextNode::from("\u{1F4A9}")));
    }

    #[test]
    fn blocks_are_recognised() {
        assert!(ContainerNode::new("P", Vec::new(), Vec::new()).is_block());
        assert!(ContainerNode::new_document(Vec::new()).is_block());
        assert!(!ContainerNode::new("a", Vec::new(), Vec::new()).is_block());
        assert!(!ContainerNode::new("sup", Vec::new(), Vec::new()).is_block());
    }

    #[test]
    fn splitting_text_drops_empty_parts() {
        let (before, after) = TextNode::from("abc").split_at_offset(0);
        assert_eq!(before, None);
        assert_eq!(after, Some(TextNode::from("abc")));
    }

    #[test]
    fn splitting_a_container_splits_nested_children() {
        let node = el("b", vec![tx("ab"), el("i", vec![tx("cd")]), tx("e")]);
        let (before, after) = node.split_at_offset(3);
        assert_eq!(
            before,
            Some(el("b", vec![tx("ab"), el("i", vec![tx("c")])]))
        );
        assert_eq!(
            after,
            Some(el("b", vec![el("i", vec![tx("d")]), tx("e")]))
        );
    }

    #[test]
    fn splitting_at_the_end_leaves_nothing_after() {
        let node = el("sup", vec![tx("xy")]);
        let (before, after) = node.clone().split_at_offset(2);
        assert_eq!(before, Some(node));
        assert_eq!(after, None);
    }

    #[test]
    fn element_names_are_lowercased() {
        let node = ContainerNode::new("SUP", Vec::new(), Vec::new());
        assert_eq!(node.name(), "sup");
        assert!(node.is_formatting());
        assert!(!node.is_void());
    }
}
