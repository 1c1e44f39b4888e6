// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{ContainerNode, Dom, DomNode, TextNode};

pub trait ToHtml {
    fn fmt_html(&self, buf: &mut String);

    fn to_html(&self) -> String {
        let mut buf = String::new();
        self.fmt_html(&mut buf);
        buf
    }
}

impl ToHtml for TextNode {
    fn fmt_html(&self, buf: &mut String) {
        buf.push_str(&encode_text(&self.data().to_string()));
    }
}

impl ToHtml for ContainerNode {
    fn fmt_html(&self, buf: &mut String) {
        if self.is_document() {
            self.children().fmt_html(buf);
            return;
        }

        buf.push('<');
        buf.push_str(self.name());
        for (name, value) in self.attributes() {
            buf.push(' ');
            buf.push_str(name);
            buf.push_str("=\"");
            buf.push_str(&encode_double_quoted_attribute(value));
            buf.push('"');
        }
        if self.is_void() {
            buf.push_str(" />");
            return;
        }
        buf.push('>');
        self.children().fmt_html(buf);
        buf.push_str("</");
        buf.push_str(self.name());
        buf.push('>');
    }
}

impl ToHtml for DomNode {
    fn fmt_html(&self, buf: &mut String) {
        match self {
            DomNode::Container(c) => c.fmt_html(buf),
            DomNode::Text(t) => t.fmt_html(buf),
        }
    }
}

impl ToHtml for [DomNode] {
    fn fmt_html(&self, buf: &mut String) {
        for node in self {
            node.fmt_html(buf);
        }
    }
}

impl ToHtml for Dom {
    fn fmt_html(&self, buf: &mut String) {
        self.document().fmt_html(buf);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_is_escaped() {
        let node = DomNode::new_text("a < b & c");
        assert_eq!(node.to_html(), "a &lt; b &amp; c");
    }

    #[test]
    fn attributes_are_quoted_and_escaped() {
        let node = DomNode::Container(ContainerNode::new(
            "a",
            vec![("href".into(), "x\"y".into())],
            vec![DomNode::new_text("link")],
        ));
        assert_eq!(node.to_html(), "<a href=\"x&quot;y\">link</a>");
    }

    #[test]
    fn void_elements_self_close() {
        let dom = Dom::new(vec![
            DomNode::new_text("a"),
            DomNode::new_element("br", Vec::new()),
            DomNode::new_text("b"),
        ]);
        assert_eq!(dom.to_html(), "a<br />b");
    }

    #[test]
    fn document_serializes_only_its_children() {
        let dom = Dom::new(vec![DomNode::new_element(
            "p",
            vec![DomNode::new_element("sup", vec![DomNode::new_text("2")])],
        )]);
        assert_eq!(dom.to_html(), "<p><sup>2</sup></p>");
    }
}
