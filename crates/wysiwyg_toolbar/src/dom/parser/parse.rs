// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::padom::{PaDom, PaDomHandle, PaDomNode};
use super::{HtmlParseError, PaDomCreator};
use crate::dom::{ContainerNode, Dom, DomNode};

static META_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<meta[^>]*>").unwrap());

/// Remove `<meta>` tags, which pasted markup often carries and which have no
/// place inside an editable fragment.
pub fn strip_meta_tags(html: &str) -> Cow<'_, str> {
    META_TAG.replace_all(html, "")
}

/// Parse an HTML fragment, failing if html5ever reported any parse error.
pub fn parse(html: &str) -> Result<Dom, HtmlParseError> {
    match PaDomCreator::parse(&strip_meta_tags(html)) {
        Ok(padom) => Ok(padom_to_dom(&padom)),
        Err(err) => Err(HtmlParseError {
            parse_errors: err.parse_errors,
        }),
    }
}

/// Parse an HTML fragment the way a browser would, returning the recovered
/// tree together with any parse errors that were reported on the way.
pub fn parse_lenient(html: &str) -> (Dom, Vec<String>) {
    match PaDomCreator::parse(&strip_meta_tags(html)) {
        Ok(padom) => (padom_to_dom(&padom), Vec::new()),
        Err(err) => (padom_to_dom(&err.dom), err.parse_errors),
    }
}

/// Convert a [PaDom] into a [Dom].
///
/// Fragment parsing wraps everything in an `html` element below the
/// document; its children become the children of the new document. Only
/// nodes reachable from the document are visited, so garbage left in the
/// arena never shows up.
fn padom_to_dom(padom: &PaDom) -> Dom {
    let mut children = Vec::new();
    for handle in padom.get_document().children() {
        match padom.get_node(handle) {
            PaDomNode::Container(c) if c.name.local.as_ref() == "html" => {
                children.extend(convert_children(padom, handle));
            }
            _ => children.extend(convert(padom, handle)),
        }
    }
    Dom::new(children)
}

fn convert_children(padom: &PaDom, handle: &PaDomHandle) -> Vec<DomNode> {
    padom
        .get_node(handle)
        .children()
        .iter()
        .filter_map(|child| convert(padom, child))
        .collect()
}

fn convert(padom: &PaDom, handle: &PaDomHandle) -> Option<DomNode> {
    match padom.get_node(handle) {
        PaDomNode::Container(c) => {
            Some(DomNode::Container(ContainerNode::new(
                c.name.local.as_ref(),
                c.attrs.clone(),
                convert_children(padom, handle),
            )))
        }
        PaDomNode::Text(t) => Some(DomNode::new_text(t.content.clone())),
        PaDomNode::Document(_) | PaDomNode::Ignored => None,
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use speculoos::{assert_that, AssertionFailure, Spec};

    use super::*;
    use crate::dom::ToHtml;

    trait Roundtrips<T> {
        fn roundtrips(&self);
    }

    impl<'s, T> Roundtrips<T> for Spec<'s, T>
    where
        T: AsRef<str>,
    {
        fn roundtrips(&self) {
            let subject = self.subject.as_ref();
            let dom = parse(subject).unwrap();

            // After parsing all our invariants should be satisifed
            dom.explicitly_assert_invariants();

            let output = dom.to_html();
            if output != subject {
                AssertionFailure::from_spec(self)
                    .with_expected(String::from(subject))
                    .with_actual(output)
                    .fail();
            }
        }
    }

    #[test]
    fn parse_plain_text() {
        assert_that!("some text").roundtrips();
    }

    #[test]
    fn parse_simple_tag() {
        assert_that!("<code>sdfds</code>").roundtrips();
    }

    #[test]
    fn parse_tag_with_surrounding_text() {
        assert_that!("before <kbd> within </kbd> after").roundtrips();
        assert_that!("before<samp>within</samp>after").roundtrips();
    }

    #[test]
    fn parse_nested_tags() {
        assert_that!("<b><var>ZZ</var></b>").roundtrips();
        assert_that!("X<sup>Y<em>ZZ</em>0</sup>1").roundtrips();
        assert_that!(" X <sub> Y <em> ZZ </em> 0 </sub> 1 ").roundtrips();
    }

    #[test]
    fn parse_tags_with_attributes() {
        assert_that!(r#"<b><a href="http://example.com">ZZ</a></b>"#)
            .roundtrips();
        assert_that!(r#"<blockquote class="pull">q</blockquote>"#).roundtrips();
    }

    #[test]
    fn parse_br_tag() {
        assert_that!("a<br />b").roundtrips();
    }

    #[test]
    fn parse_paragraphs() {
        assert_that!("<p>x</p><p>y</p>").roundtrips();
    }

    #[test]
    fn parse_keeps_whitespace_between_blocks() {
        let html = indoc! {"
            <p>one</p>
            <p>two</p>
        "};
        assert_that!(html).roundtrips();
    }

    #[test]
    fn meta_tags_are_stripped() {
        let dom = parse(r#"<meta charset="utf-8"><p>Content</p>"#).unwrap();
        assert_eq!(dom.to_html(), "<p>Content</p>");
    }

    #[test]
    fn uppercase_tags_are_lowercased() {
        let dom = parse("<SUP>2</SUP>").unwrap();
        assert_eq!(dom.to_html(), "<sup>2</sup>");
    }

    #[test]
    fn lenient_parsing_recovers_from_stray_end_tags() {
        let (dom, errors) = parse_lenient("<p>x</b></p>");
        assert!(!errors.is_empty());
        assert_eq!(dom.to_html(), "<p>x</p>");
    }

    #[test]
    fn strict_parsing_reports_errors() {
        let result = parse("<p>x</b></p>");
        assert!(result.is_err());
    }
}
