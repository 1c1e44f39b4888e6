// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Sanitizes region markup before the host stores it.
//!
//! Elements with a rule are kept with only the attributes the rule allows.
//! Elements without one are unwrapped, keeping their children, except for
//! `script` and `style` which go away together with their content.

use std::collections::HashMap;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::parser::parse_lenient;
use crate::dom::{ContainerNode, Dom, DomNode, ToHtml};

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*):").unwrap());

const ALLOWED_SCHEMES: [&str; 5] = ["http", "https", "ftp", "mailto", "tel"];

const DROPPED_ELEMENTS: [&str; 2] = ["script", "style"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeCheck {
    /// Keep any value.
    Allow,
    /// Keep the value only if [`check_url`] accepts it.
    Url,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementRule {
    AllowWithoutAttributes,
    Attributes(HashMap<String, AttributeCheck>),
}

impl ElementRule {
    pub fn attributes(checks: &[(&str, AttributeCheck)]) -> Self {
        Self::Attributes(
            checks
                .iter()
                .map(|(name, check)| (name.to_string(), *check))
                .collect(),
        )
    }

    fn filter(&self, attrs: &[(String, String)]) -> Vec<(String, String)> {
        let Self::Attributes(checks) = self else {
            return Vec::new();
        };
        attrs
            .iter()
            .filter(|(name, value)| match checks.get(name) {
                Some(AttributeCheck::Allow) => true,
                Some(AttributeCheck::Url) => check_url(value).is_some(),
                None => false,
            })
            .cloned()
            .collect()
    }
}

/// The URL itself if it is relative or uses a scheme that is safe to link
/// to, otherwise `None`.
pub fn check_url(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    // Browsers ignore control characters and whitespace inside schemes
    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match URL_SCHEME.captures(&compact) {
        Some(captures) => {
            let scheme = captures[1].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str()).then_some(url)
        }
        None => Some(url),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Whitelist {
    rules: HashMap<String, ElementRule>,
}

impl Default for Whitelist {
    fn default() -> Self {
        let mut rules = HashMap::new();
        for name in [
            "b", "br", "code", "div", "em", "h1", "h2", "h3", "h4", "h5", "h6",
            "hr", "i", "kbd", "li", "ol", "p", "samp", "strong", "sub", "sup",
            "ul", "var",
        ] {
            rules.insert(name.to_owned(), ElementRule::AllowWithoutAttributes);
        }
        rules.insert(
            "a".to_owned(),
            ElementRule::attributes(&[("href", AttributeCheck::Url)]),
        );
        rules.insert(
            "img".to_owned(),
            ElementRule::attributes(&[
                ("src", AttributeCheck::Url),
                ("alt", AttributeCheck::Allow),
                ("width", AttributeCheck::Allow),
                ("height", AttributeCheck::Allow),
            ]),
        );
        rules.insert(
            "blockquote".to_owned(),
            ElementRule::attributes(&[("class", AttributeCheck::Allow)]),
        );
        Self { rules }
    }
}

impl Whitelist {
    /// A whitelist that allows nothing; every element gets unwrapped.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn with_rule(mut self, element: &str, rule: ElementRule) -> Self {
        self.rules.insert(element.to_ascii_lowercase(), rule);
        self
    }

    pub fn rule_for(&self, element: &str) -> Option<&ElementRule> {
        self.rules.get(element)
    }

    /// A sanitized copy of `dom`.
    pub fn clean(&self, dom: &Dom) -> Dom {
        let mut cleaned = Dom::new(self.clean_children(dom.document().children()));
        cleaned.normalize();
        cleaned
    }

    pub fn clean_html(&self, html: &str) -> String {
        let (dom, errors) = parse_lenient(html);
        if !errors.is_empty() {
            warn!("cleaning markup with {} parse error(s)", errors.len());
        }
        self.clean(&dom).to_html()
    }

    fn clean_children(&self, children: &[DomNode]) -> Vec<DomNode> {
        let mut cleaned = Vec::new();
        for child in children {
            match child {
                DomNode::Text(_) => cleaned.push(child.clone()),
                DomNode::Container(c) => {
                    if DROPPED_ELEMENTS.contains(&c.name()) {
                        continue;
                    }
                    let children = self.clean_children(c.children());
                    match self.rules.get(c.name()) {
                        Some(rule) => {
                            cleaned.push(DomNode::Container(ContainerNode::new(
                                c.name(),
                                rule.filter(c.attributes()),
                                children,
                            )))
                        }
                        None => cleaned.extend(children),
                    }
                }
            }
        }
        cleaned
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn clean(html: &str) -> String {
        Whitelist::default().clean_html(html)
    }

    #[test]
    fn allowed_elements_lose_their_attributes() {
        assert_eq!(
            clean(r#"<p style="color: red">a <kbd id="k">b</kbd></p>"#),
            "<p>a <kbd>b</kbd></p>"
        );
    }

    #[test]
    fn unknown_elements_are_unwrapped() {
        assert_eq!(clean("<p><span>a</span>b<font>c</font></p>"), "<p>abc</p>");
    }

    #[test]
    fn scripts_and_styles_are_dropped_with_their_content() {
        assert_eq!(
            clean("<p>a<script>alert(1)</script><style>p{}</style>b</p>"),
            "<p>ab</p>"
        );
    }

    #[test]
    fn blockquote_keeps_its_class() {
        assert_eq!(
            clean(r#"<blockquote class="pull" title="t">q</blockquote>"#),
            r#"<blockquote class="pull">q</blockquote>"#
        );
    }

    #[test]
    fn links_keep_safe_hrefs_only() {
        assert_eq!(
            clean(r#"<a href="https://example.com" target="_blank">x</a>"#),
            r#"<a href="https://example.com">x</a>"#
        );
        assert_eq!(clean(r#"<a href="javascript:alert(1)">x</a>"#), "<a>x</a>");
    }

    #[test]
    fn url_check_accepts_relative_and_known_schemes() {
        assert_eq!(check_url("/docs/page"), Some("/docs/page"));
        assert_eq!(check_url("#top"), Some("#top"));
        assert_eq!(check_url("MAILTO:me@example.com"), Some("MAILTO:me@example.com"));
        assert_eq!(check_url("tel:+123"), Some("tel:+123"));
        assert_eq!(check_url("java\tscript:alert(1)"), None);
        assert_eq!(check_url("data:text/html,x"), None);
    }

    #[test]
    fn extra_rules_can_be_added() {
        let whitelist =
            Whitelist::default().with_rule("MARK", ElementRule::AllowWithoutAttributes);
        assert_eq!(whitelist.clean_html("<mark>x</mark>"), "<mark>x</mark>");
        assert!(whitelist.rule_for("mark").is_some());
    }

    #[test]
    fn empty_whitelist_leaves_only_text() {
        assert_eq!(
            Whitelist::empty().clean_html("<p>a<b>b</b></p><p>c</p>"),
            "abc"
        );
    }
}
