// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

mod config;
pub mod dom;
mod enclosing;
mod localization;
mod raw_markup_dialog;
mod region;
mod selection;
mod toggle_button;
mod toolbar;
mod whitelist;

pub use crate::config::ConfigError;
pub use crate::config::ToolbarConfig;
pub use crate::config::UnwrapScope;
pub use crate::dom::parser::parse;
pub use crate::dom::parser::parse_lenient;
pub use crate::dom::parser::HtmlParseError;
pub use crate::dom::Dom;
pub use crate::dom::ToHtml;
pub use crate::enclosing::find_enclosing;
pub use crate::enclosing::is_enclosed;
pub use crate::localization::dialog_labels;
pub use crate::localization::supported_languages;
pub use crate::localization::DialogLabels;
pub use crate::raw_markup_dialog::DialogPosition;
pub use crate::raw_markup_dialog::DialogSession;
pub use crate::raw_markup_dialog::DialogState;
pub use crate::raw_markup_dialog::Layout;
pub use crate::raw_markup_dialog::RawMarkupDialog;
pub use crate::raw_markup_dialog::Rect;
pub use crate::raw_markup_dialog::ScrollOffset;
pub use crate::region::Command;
pub use crate::region::CommandError;
pub use crate::region::EditableRegion;
pub use crate::region::HtmlRegion;
pub use crate::region::ListenerId;
pub use crate::region::NativeCommand;
pub use crate::region::RegionEvent;
pub use crate::region::RegionListener;
pub use crate::selection::AncestorNode;
pub use crate::selection::CommonAncestor;
pub use crate::selection::Selection;
pub use crate::toggle_button::wrap_markup;
pub use crate::toggle_button::ButtonState;
pub use crate::toggle_button::InlineFormat;
pub use crate::toggle_button::ToggleButton;
pub use crate::toggle_button::ToggleButtonSpec;
pub use crate::toggle_button::ToggleStrategy;
pub use crate::toolbar::ButtonId;
pub use crate::toolbar::ButtonKind;
pub use crate::toolbar::EventQueue;
pub use crate::toolbar::Toolbar;
pub use crate::toolbar::ToolbarButton;
pub use crate::toolbar::ToolbarContainer;
pub use crate::whitelist::check_url;
pub use crate::whitelist::AttributeCheck;
pub use crate::whitelist::ElementRule;
pub use crate::whitelist::Whitelist;
