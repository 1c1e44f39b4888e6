// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! One parameterized controller for every inline-format toolbar button.
//!
//! A button's checked state is never stored: it is recomputed from a fresh
//! [`Selection`] each time it is asked for, and a click re-resolves it before
//! deciding whether to unwrap or to wrap.

use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::config::UnwrapScope;
use crate::enclosing::is_enclosed;
use crate::region::{Command, EditableRegion, NativeCommand};
use crate::selection::Selection;

/// How a button applies its format when the selection is not enclosed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleStrategy {
    /// Ask the region to run a command it implements natively.
    NativeCommand(NativeCommand),
    /// Replace the selection with its markup wrapped in the button's tag.
    #[default]
    MarkupWrap,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleButtonSpec {
    pub tag_name: String,
    pub label: String,
    pub icon: String,
    #[serde(default)]
    pub strategy: ToggleStrategy,
}

impl ToggleButtonSpec {
    pub fn new(
        tag_name: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        strategy: ToggleStrategy,
    ) -> Self {
        Self {
            tag_name: tag_name.into(),
            label: label.into(),
            icon: icon.into(),
            strategy,
        }
    }

    /// The specs of every [`InlineFormat`], in toolbar order.
    pub fn builtins() -> Vec<Self> {
        use strum::IntoEnumIterator;
        InlineFormat::iter().map(|format| format.spec()).collect()
    }
}

/// The inline formats the toolbar ships with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum InlineFormat {
    Superscript,
    Subscript,
    Code,
    Kbd,
    Var,
    Samp,
}

impl InlineFormat {
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Superscript => "sup",
            Self::Subscript => "sub",
            Self::Code => "code",
            Self::Kbd => "kbd",
            Self::Var => "var",
            Self::Samp => "samp",
        }
    }

    pub fn spec(&self) -> ToggleButtonSpec {
        let (label, icon, strategy) = match self {
            Self::Superscript => (
                "Superscript",
                "fa fa-superscript",
                ToggleStrategy::NativeCommand(NativeCommand::Superscript),
            ),
            Self::Subscript => (
                "Subscript",
                "fa fa-subscript",
                ToggleStrategy::NativeCommand(NativeCommand::Subscript),
            ),
            Self::Code => ("Code Span", "fa fa-code", ToggleStrategy::MarkupWrap),
            Self::Kbd => {
                ("KBD Span", "fa fa-keyboard", ToggleStrategy::MarkupWrap)
            }
            Self::Var => {
                ("Variable Span", "fa fa-variable", ToggleStrategy::MarkupWrap)
            }
            Self::Samp => {
                ("Sample Span", "fa fa-sample", ToggleStrategy::MarkupWrap)
            }
        };
        ToggleButtonSpec::new(self.tag_name(), label, icon, strategy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ButtonState {
    Enclosed,
    NotEnclosed,
}

impl ButtonState {
    pub fn is_checked(&self) -> bool {
        matches!(self, Self::Enclosed)
    }
}

impl From<bool> for ButtonState {
    fn from(enclosed: bool) -> Self {
        if enclosed {
            Self::Enclosed
        } else {
            Self::NotEnclosed
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleButton {
    spec: ToggleButtonSpec,
    unwrap_scope: UnwrapScope,
}

impl ToggleButton {
    pub fn new(spec: ToggleButtonSpec, unwrap_scope: UnwrapScope) -> Self {
        Self { spec, unwrap_scope }
    }

    pub fn spec(&self) -> &ToggleButtonSpec {
        &self.spec
    }

    pub fn tag_name(&self) -> &str {
        &self.spec.tag_name
    }

    pub fn state_for(&self, selection: &Selection) -> ButtonState {
        is_enclosed(selection, &self.spec.tag_name).into()
    }

    /// Whether the region's current selection sits inside this button's
    /// element.
    pub fn query_state<R>(&self, region: &R) -> ButtonState
    where
        R: EditableRegion + ?Sized,
    {
        self.state_for(&region.get_selection())
    }

    /// The command a click issues against `selection`.
    pub fn command_for(&self, selection: &Selection) -> Command {
        match self.state_for(selection) {
            ButtonState::Enclosed => match self.unwrap_scope {
                UnwrapScope::AllFormatting => Command::RemoveFormat,
                UnwrapScope::EnclosingTag => {
                    Command::Unwrap(self.spec.tag_name.clone())
                }
            },
            ButtonState::NotEnclosed => match self.spec.strategy {
                ToggleStrategy::NativeCommand(native) => Command::Native(native),
                ToggleStrategy::MarkupWrap => {
                    let markup = wrap_markup(&self.spec.tag_name, selection);
                    debug!("{}: wrapping selection as {markup:?}", self.tag_name());
                    Command::InsertHtml(markup)
                }
            },
        }
    }

    /// Toggle the format on the region's current selection and return the
    /// command that was issued. A command the region rejects is dropped.
    pub fn on_click<R>(&self, region: &mut R) -> Command
    where
        R: EditableRegion + ?Sized,
    {
        let command = self.command_for(&region.get_selection());
        if let Err(err) = region.execute(command.clone()) {
            debug!("{}: ignoring rejected command: {err}", self.tag_name());
        }
        command
    }
}

/// `<tag>` + the trimmed selection markup + `</tag>`, followed by one space
/// if the selected text ended with whitespace.
pub fn wrap_markup(tag_name: &str, selection: &Selection) -> String {
    let mut markup =
        format!("<{tag_name}>{}</{tag_name}>", selection.html().trim());
    if selection.text().ends_with(char::is_whitespace) {
        markup.push(' ');
    }
    markup
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::region::HtmlRegion;
    use crate::selection::{AncestorNode, CommonAncestor};

    fn button(format: InlineFormat) -> ToggleButton {
        ToggleButton::new(format.spec(), UnwrapScope::AllFormatting)
    }

    fn inside(tags: &[&str], text: &str) -> Selection {
        let mut chain = vec![AncestorNode::Text];
        chain.extend(tags.iter().map(|tag| AncestorNode::element(tag)));
        Selection::new(text, text, Some(CommonAncestor::new(chain)))
    }

    #[test]
    fn builtins_cover_every_inline_format_in_order() {
        let tags: Vec<String> = ToggleButtonSpec::builtins()
            .into_iter()
            .map(|spec| spec.tag_name)
            .collect();
        assert_eq!(tags, vec!["sup", "sub", "code", "kbd", "var", "samp"]);
    }

    #[test]
    fn only_superscript_and_subscript_are_native() {
        for format in InlineFormat::iter() {
            let native = matches!(
                format.spec().strategy,
                ToggleStrategy::NativeCommand(_)
            );
            assert_eq!(
                native,
                matches!(format, InlineFormat::Superscript | InlineFormat::Subscript),
                "{format}"
            );
        }
    }

    #[test]
    fn state_is_derived_from_the_ancestor_chain() {
        let code = button(InlineFormat::Code);
        assert_eq!(code.state_for(&inside(&["code", "p"], "x")), ButtonState::Enclosed);
        assert_eq!(
            code.state_for(&inside(&["kbd", "p"], "x")),
            ButtonState::NotEnclosed
        );
        assert_eq!(
            code.state_for(&Selection::collapsed()),
            ButtonState::NotEnclosed
        );
        assert!(ButtonState::Enclosed.is_checked());
        assert!(!ButtonState::NotEnclosed.is_checked());
    }

    #[test]
    fn enclosed_click_removes_all_formatting_by_default() {
        let sup = button(InlineFormat::Superscript);
        assert_eq!(
            sup.command_for(&inside(&["sup", "p"], "2")),
            Command::RemoveFormat
        );
    }

    #[test]
    fn enclosed_click_can_be_scoped_to_the_enclosing_tag() {
        let kbd =
            ToggleButton::new(InlineFormat::Kbd.spec(), UnwrapScope::EnclosingTag);
        assert_eq!(
            kbd.command_for(&inside(&["kbd", "b"], "x")),
            Command::Unwrap("kbd".into())
        );
    }

    #[test]
    fn native_buttons_issue_their_command_when_not_enclosed() {
        let sub = button(InlineFormat::Subscript);
        assert_eq!(
            sub.command_for(&inside(&["p"], "2")),
            Command::Native(NativeCommand::Subscript)
        );
    }

    #[test]
    fn markup_buttons_insert_wrapped_markup() {
        let var = button(InlineFormat::Var);
        let selection = Selection::new(
            "x y",
            "x <b>y</b>",
            Some(CommonAncestor::new(vec![AncestorNode::element("p")])),
        );
        assert_eq!(
            var.command_for(&selection),
            Command::InsertHtml("<var>x <b>y</b></var>".into())
        );
    }

    #[test]
    fn trailing_whitespace_becomes_exactly_one_space() {
        let selection = Selection::new("hello \t", " hello \t", None);
        assert_eq!(wrap_markup("code", &selection), "<code>hello</code> ");
    }

    #[test]
    fn no_trailing_space_without_trailing_whitespace() {
        let selection = Selection::new(" hello", " hello", None);
        assert_eq!(wrap_markup("samp", &selection), "<samp>hello</samp>");
    }

    #[test]
    fn query_state_reads_the_region() {
        let mut region = HtmlRegion::from_html("<p>x<sup>2</sup></p>");
        region.select(1, 2);
        assert!(button(InlineFormat::Superscript).query_state(&region).is_checked());
        assert!(!button(InlineFormat::Subscript).query_state(&region).is_checked());
    }

    #[test]
    fn rejected_commands_are_swallowed() {
        let mut region = HtmlRegion::from_html("<p>hello</p>");
        region.select(0, 5);
        region.set_enabled(false);
        let command = button(InlineFormat::Code).on_click(&mut region);
        assert_eq!(command, Command::InsertHtml("<code>hello</code>".into()));
        assert_eq!(region.get_markup(), "<p>hello</p>");
    }
}
