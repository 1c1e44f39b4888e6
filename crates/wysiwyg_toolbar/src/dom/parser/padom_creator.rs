// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::padom::{PaDom, PaDomHandle, PaDomNode, PaNodeText};
use super::{paqual_name, PaDomCreationError};
use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};
use std::cell::{Ref, RefCell};

pub(crate) type DomCreationResult = Result<PaDom, PaDomCreationError>;

/// html5ever sink that records the parsed fragment into a [`PaDom`].
pub(crate) struct PaDomCreator {
    state: RefCell<PaDomCreationError>,
}

impl PaDomCreator {
    pub fn parse(html: &str) -> DomCreationResult {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name(""),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    fn insert_at(
        &self,
        parent: &PaDomHandle,
        index: Option<usize>,
        child: NodeOrText<PaDomHandle>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if !dom.get_node(parent).is_container() {
            return;
        }
        let len = dom.get_node(parent).children().len();
        let mut index = index.unwrap_or(len).min(len);
        match child {
            NodeOrText::AppendNode(node) => {
                if let Some((old_parent, old_index)) = dom.parent_of(&node) {
                    if old_parent == *parent && old_index < index {
                        index -= 1;
                    }
                    dom.detach(&node);
                }
                if let Some(children) = dom.get_mut_node(parent).children_mut()
                {
                    children.insert(index, node);
                }
            }
            NodeOrText::AppendText(tendril) => {
                // Text directly after a text node joins it
                let previous = index
                    .checked_sub(1)
                    .and_then(|i| dom.get_node(parent).children().get(i))
                    .copied();
                if let Some(previous) = previous {
                    if let PaDomNode::Text(t) = dom.get_mut_node(&previous) {
                        t.content += tendril.as_ref();
                        return;
                    }
                }
                let text = dom.add_node(PaDomNode::Text(PaNodeText {
                    content: tendril.as_ref().to_owned(),
                }));
                if let Some(children) = dom.get_mut_node(parent).children_mut()
                {
                    children.insert(index, text);
                }
            }
        }
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(PaDomCreationError::new()),
        }
    }
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = DomCreationResult;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let state = self.state.into_inner();
        if state.parse_errors.is_empty() {
            Ok(state.dom)
        } else {
            Err(state)
        }
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| state.dom.name_of(target))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .create_element(name, attrs, flags)
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Ignored)
    }

    fn create_pi(
        &self,
        _target: StrTendril,
        _data: StrTendril,
    ) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Ignored)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.insert_at(parent, None, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.parent_of(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes carry nothing worth keeping in a fragment
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are kept inline as ordinary children
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let parent = self.state.borrow().dom.parent_of(sibling);
        if let Some((parent, index)) = parent {
            self.insert_at(&parent, Some(index), new_node);
        }
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            let to_add: Vec<(String, String)> = attrs
                .iter()
                .filter(|attr| {
                    let attr_name = attr.name.local.as_ref();
                    !node.attrs.iter().any(|(name, _)| name == attr_name)
                })
                .map(|attr| {
                    (
                        attr.name.local.as_ref().to_owned(),
                        attr.value.as_ref().to_owned(),
                    )
                })
                .collect();
            node.attrs.extend(to_add);
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().dom.detach(target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        let moved = match dom.get_mut_node(node).children_mut() {
            Some(children) => std::mem::take(children),
            None => return,
        };
        if let Some(children) = dom.get_mut_node(new_parent).children_mut() {
            children.extend(moved);
        }
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err(String::from("Declarative shadow roots are not supported"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::parser::padom::PaNodeContainer;

    #[derive(Clone, Debug, PartialEq)]
    enum Shape {
        El(String, Vec<(String, String)>, Vec<Shape>),
        Tx(String),
    }

    /// Rebuild the reachable part of a PaDom as a plain tree, skipping
    /// garbage nodes.
    fn shape(dom: &PaDom, handle: &PaDomHandle) -> Vec<Shape> {
        dom.get_node(handle)
            .children()
            .iter()
            .filter_map(|child| match dom.get_node(child) {
                PaDomNode::Container(PaNodeContainer { name, attrs, .. }) => {
                    Some(Shape::El(
                        name.local.to_string(),
                        attrs.clone(),
                        shape(dom, child),
                    ))
                }
                PaDomNode::Text(t) => Some(Shape::Tx(t.content.clone())),
                PaDomNode::Document(_) | PaDomNode::Ignored => None,
            })
            .collect()
    }

    fn el(name: &str, children: Vec<Shape>) -> Shape {
        Shape::El(name.to_owned(), Vec::new(), children)
    }

    fn tx(content: &str) -> Shape {
        Shape::Tx(content.to_owned())
    }

    fn parse(input: &str) -> Vec<Shape> {
        let dom = PaDomCreator::parse(input).unwrap();
        shape(&dom, &dom.document_handle())
    }

    #[test]
    fn parsing_an_empty_string_creates_an_empty_dom() {
        assert_eq!(parse(""), vec![el("html", vec![])]);
    }

    #[test]
    fn parsing_a_text_snippet_creates_one_node() {
        assert_eq!(parse("foo"), vec![el("html", vec![tx("foo")])]);
    }

    #[test]
    fn parsing_nested_structures_produces_them() {
        assert_eq!(
            parse("A<kbd>B<var>C</var>D</kbd>E"),
            vec![el(
                "html",
                vec![
                    tx("A"),
                    el("kbd", vec![tx("B"), el("var", vec![tx("C")]), tx("D")]),
                    tx("E"),
                ]
            )]
        );
    }

    #[test]
    fn parsing_tags_with_attributes_preserves_them() {
        assert_eq!(
            parse("<blockquote class='note'>txt</blockquote>"),
            vec![el(
                "html",
                vec![Shape::El(
                    "blockquote".into(),
                    vec![("class".into(), "note".into())],
                    vec![tx("txt")],
                )]
            )]
        );
    }

    #[test]
    fn parsing_text_node_with_escaped_html_entities() {
        assert_eq!(
            parse("aaa&lt;code&gt;bbb&lt;/code&gt;ccc"),
            vec![el("html", vec![tx("aaa<code>bbb</code>ccc")])]
        );
    }

    #[test]
    fn comments_are_not_part_of_the_tree() {
        assert_eq!(
            parse("a<!-- note -->b"),
            vec![el("html", vec![tx("a"), tx("b")])]
        );
    }
}
