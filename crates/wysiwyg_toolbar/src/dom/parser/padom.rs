// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The arena document html5ever builds into while parsing. Nodes refer to
//! their children by handle and every node ever created stays in the arena,
//! so a [`PaDom`] may hold garbage that [`super::parse`] simply never visits.

use html5ever::tree_builder::ElementFlags;
use html5ever::{Attribute, QualName};

use super::paqual_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeContainer {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<PaDomHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeText {
    pub(crate) content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Document(PaNodeContainer),
    Container(PaNodeContainer),
    Text(PaNodeText),
    /// Comments and processing instructions; never converted.
    Ignored,
}

impl PaDomNode {
    pub(crate) fn is_container(&self) -> bool {
        matches!(self, PaDomNode::Document(_) | PaDomNode::Container(_))
    }

    pub(crate) fn children(&self) -> &[PaDomHandle] {
        match self {
            PaDomNode::Document(c) | PaDomNode::Container(c) => &c.children,
            PaDomNode::Text(_) | PaDomNode::Ignored => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<PaDomHandle>> {
        match self {
            PaDomNode::Document(c) | PaDomNode::Container(c) => {
                Some(&mut c.children)
            }
            PaDomNode::Text(_) | PaDomNode::Ignored => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaDom {
    nodes: Vec<PaDomNode>,
    document_handle: PaDomHandle,
    unnamed: QualName,
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer {
                name: paqual_name(""),
                attrs: Vec::new(),
                children: Vec::new(),
            })],
            document_handle: PaDomHandle(0),
            unnamed: paqual_name(""),
        }
    }

    pub(crate) fn document_handle(&self) -> PaDomHandle {
        self.document_handle
    }

    pub(crate) fn get_document(&self) -> &PaDomNode {
        self.get_node(&self.document_handle)
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &PaDomHandle,
    ) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    /// The element name of a node; text and ignored nodes have none and
    /// report an empty name.
    pub(crate) fn name_of(&self, handle: &PaDomHandle) -> &QualName {
        match self.get_node(handle) {
            PaDomNode::Document(c) | PaDomNode::Container(c) => &c.name,
            PaDomNode::Text(_) | PaDomNode::Ignored => &self.unnamed,
        }
    }

    pub(crate) fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> PaDomHandle {
        self.add_node(PaDomNode::Container(PaNodeContainer {
            name,
            attrs: attrs
                .into_iter()
                .map(|attr| {
                    (
                        attr.name.local.as_ref().to_owned(),
                        attr.value.as_ref().to_owned(),
                    )
                })
                .collect(),
            children: Vec::new(),
        }))
    }

    pub(crate) fn parent_of(
        &self,
        child: &PaDomHandle,
    ) -> Option<(PaDomHandle, usize)> {
        self.nodes.iter().enumerate().find_map(|(i, node)| {
            node.children()
                .iter()
                .position(|c| c == child)
                .map(|index| (PaDomHandle(i), index))
        })
    }

    pub(crate) fn detach(&mut self, child: &PaDomHandle) {
        if let Some((parent, index)) = self.parent_of(child) {
            if let Some(children) = self.get_mut_node(&parent).children_mut() {
                children.remove(index);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_padom_has_an_empty_document() {
        let dom = PaDom::new();
        assert!(matches!(dom.get_document(), PaDomNode::Document(_)));
        assert!(dom.get_document().children().is_empty());
    }

    #[test]
    fn detaching_removes_the_child_from_its_parent() {
        let mut dom = PaDom::new();
        let text = dom.add_node(PaDomNode::Text(PaNodeText {
            content: "x".into(),
        }));
        let doc = dom.document_handle();
        dom.get_mut_node(&doc).children_mut().unwrap().push(text);
        assert_eq!(dom.parent_of(&text), Some((doc, 0)));
        dom.detach(&text);
        assert_eq!(dom.parent_of(&text), None);
    }
}
