// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Defines the [`EditableRegion`] trait, the contract between the toolbar
//! controllers and whatever hosts the editable content.
//!
//! [`HtmlRegion`] is the in-memory implementation that ships with this
//! crate.

mod html_region;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

pub use html_region::HtmlRegion;

use crate::Selection;

/// Formatting commands the host editor implements natively.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NativeCommand {
    Superscript,
    Subscript,
}

impl NativeCommand {
    /// The element the command toggles.
    pub fn tag_name(&self) -> &'static str {
        match self {
            NativeCommand::Superscript => "sup",
            NativeCommand::Subscript => "sub",
        }
    }
}

/// A command dispatched to an [`EditableRegion`].
#[derive(Clone, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum Command {
    /// Strip inline formatting from the selection.
    #[strum(serialize = "removeFormat")]
    RemoveFormat,
    /// Strip only elements with this name from the selection.
    #[strum(serialize = "unwrap")]
    Unwrap(String),
    #[strum(serialize = "native")]
    Native(NativeCommand),
    /// Replace the selection with this markup.
    #[strum(serialize = "insertHTML")]
    InsertHtml(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Native(native) => native.into(),
            other => other.into(),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("the region is disabled, `{command}` was rejected")]
    Disabled { command: &'static str },
    #[error("selection [{start}, {end}) lies outside the content (length {len})")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("selection [{start}, {end}) spans more than one block, `{command}` was rejected")]
    CrossesBlocks {
        command: &'static str,
        start: usize,
        end: usize,
    },
}

/// Notifications a region sends to its listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum RegionEvent {
    Activated,
    Deactivated,
    ContentChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) usize);

pub type RegionListener = Box<dyn FnMut(&RegionEvent)>;

/// The live, user-editable content the toolbar operates on.
///
/// Everything runs on a single event loop: each method runs to completion
/// before the next event is handled, so implementations need no locking.
pub trait EditableRegion {
    /// A fresh snapshot of the current selection.
    fn get_selection(&self) -> Selection;

    /// Run a formatting or insertion command against the current selection.
    fn execute(&mut self, command: Command) -> Result<(), CommandError>;

    /// The whole content, serialized.
    fn get_markup(&self) -> String;

    /// Replace the whole content. Does not notify listeners by itself.
    fn set_markup(&mut self, markup: &str);

    /// While locked, losing focus does not deactivate the region.
    fn lock_active(&mut self, locked: bool);

    /// Give the keyboard focus back to the region.
    fn focus(&mut self);

    /// Tell listeners the content changed.
    fn notify_content_changed(&mut self);

    fn subscribe(&mut self, listener: RegionListener) -> ListenerId;

    fn unsubscribe(&mut self, id: ListenerId);
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn command_names_match_the_editor_commands() {
        assert_eq!(Command::RemoveFormat.name(), "removeFormat");
        assert_eq!(Command::InsertHtml("x".into()).name(), "insertHTML");
        assert_eq!(Command::Unwrap("kbd".into()).name(), "unwrap");
        assert_eq!(
            Command::Native(NativeCommand::Superscript).name(),
            "superscript"
        );
        assert_eq!(Command::Native(NativeCommand::Subscript).name(), "subscript");
    }

    #[test]
    fn native_commands_parse_from_their_names() {
        for native in NativeCommand::iter() {
            assert_eq!(NativeCommand::from_str(native.as_ref()), Ok(native));
        }
        assert!(NativeCommand::from_str("bold").is_err());
    }

    #[test]
    fn native_commands_toggle_their_elements() {
        assert_eq!(NativeCommand::Superscript.tag_name(), "sup");
        assert_eq!(NativeCommand::Subscript.tag_name(), "sub");
    }
}
