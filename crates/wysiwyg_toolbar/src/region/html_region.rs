// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use log::{debug, warn};
use widestring::Utf16String;

use super::{
    Command, CommandError, EditableRegion, ListenerId, NativeCommand,
    RegionEvent, RegionListener,
};
use crate::dom::parser::parse_lenient;
use crate::dom::{ContainerNode, Dom, DomNode, ToHtml};
use crate::enclosing::is_enclosed;
use crate::selection::{AncestorNode, CommonAncestor, Selection};
use crate::whitelist::Whitelist;

/// An in-memory editable region holding an HTML document and a selection.
///
/// Selection offsets are UTF-16 code units into the plain text of the
/// document, matching platform text APIs.
pub struct HtmlRegion {
    dom: Dom,
    selection_start: usize,
    selection_end: usize,
    enabled: bool,
    active: bool,
    keep_active: bool,
    focused: bool,
    listeners: Vec<(ListenerId, RegionListener)>,
    next_listener_id: usize,
}

impl Default for HtmlRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRegion {
    /// Create an empty, enabled and inactive region.
    pub fn new() -> Self {
        Self {
            dom: Dom::default(),
            selection_start: 0,
            selection_end: 0,
            enabled: true,
            active: false,
            keep_active: false,
            focused: false,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Create a region pre-populated with HTML content.
    pub fn from_html(html: &str) -> Self {
        let mut region = Self::new();
        region.dom = parse_markup(html);
        region
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Set the selection (UTF-16 code unit offsets).
    pub fn select(&mut self, start: usize, end: usize) {
        self.selection_start = start;
        self.selection_end = end;
    }

    /// Get the current selection as (start, end) UTF-16 offsets.
    pub fn get_selection_offsets(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    /// Whether the selection is a range (start != end).
    pub fn has_selection(&self) -> bool {
        self.selection_start != self.selection_end
    }

    fn sel_start(&self) -> usize {
        self.selection_start.min(self.selection_end)
    }

    fn sel_end(&self) -> usize {
        self.selection_start.max(self.selection_end)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether deactivation on blur is currently suppressed.
    pub fn is_locked_active(&self) -> bool {
        self.keep_active
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn activate(&mut self) {
        if !self.active {
            self.active = true;
            self.emit(RegionEvent::Activated);
        }
    }

    /// Focus moved away from the region. Ignored while the active-lock is
    /// held.
    pub fn blur(&mut self) {
        self.focused = false;
        if self.keep_active {
            debug!("blur ignored: region is locked active");
            return;
        }
        self.deactivate();
    }

    /// Deactivate the region, whatever the active-lock says. Listeners are
    /// told even if the region was not active.
    pub fn deactivate(&mut self) {
        self.focused = false;
        self.active = false;
        self.emit(RegionEvent::Deactivated);
    }

    pub fn get_content_as_plain_text(&self) -> String {
        self.dom.to_plain_text()
    }

    /// The content run through `whitelist`, as it should be stored. The
    /// region itself is left untouched.
    pub fn get_content_as_clean_html(&self, whitelist: &Whitelist) -> String {
        whitelist.clean(&self.dom).to_html()
    }

    fn emit(&mut self, event: RegionEvent) {
        debug!("region event: {event}");
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn toggle_native(&mut self, native: NativeCommand, start: usize, end: usize) {
        let tag = native.tag_name();
        if is_enclosed(&self.get_selection(), tag) {
            self.dom
                .remove_formatting(start, end, |c| c.name() == tag);
        } else {
            self.dom.wrap_text_in(start, end, tag);
        }
    }

    fn insert_html(&mut self, html: &str, start: usize, end: usize) {
        let mut fragment = parse_markup(html);
        let nodes = std::mem::take(fragment.document_mut().children_mut());
        let inserted: String = nodes.iter().map(DomNode::to_plain_text).collect();
        self.dom.replace_range_with(start, end, nodes);

        // Select what was inserted so that a following toggle sees it
        self.selection_start = start;
        self.selection_end = start + Utf16String::from_str(inserted.trim_end()).len();
    }
}

impl EditableRegion for HtmlRegion {
    fn get_selection(&self) -> Selection {
        let (start, end) = (self.sel_start(), self.sel_end());
        let common_ancestor =
            self.dom.common_ancestor_of_range(start, end).map(|handle| {
                CommonAncestor::new(
                    self.dom
                        .ancestors_of(&handle)
                        .into_iter()
                        .map(|node| match node {
                            DomNode::Text(_) => AncestorNode::Text,
                            DomNode::Container(c) => {
                                AncestorNode::element(c.name())
                            }
                        })
                        .collect(),
                )
            });
        Selection::new(
            self.dom.plain_text_in(start, end),
            self.dom.fragment_to_html(start, end),
            common_ancestor,
        )
    }

    fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        if !self.enabled {
            return Err(CommandError::Disabled {
                command: command.name(),
            });
        }
        let (start, end) = (self.sel_start(), self.sel_end());
        let len = self.dom.text_len();
        if end > len {
            return Err(CommandError::InvalidRange { start, end, len });
        }
        // Inline markup cannot span blocks; only stripping may
        let inserts_markup =
            matches!(command, Command::Native(_) | Command::InsertHtml(_));
        if inserts_markup && self.dom.range_crosses_blocks(start, end) {
            return Err(CommandError::CrossesBlocks {
                command: command.name(),
                start,
                end,
            });
        }

        debug!("executing {} on [{start}, {end})", command.name());
        match command {
            Command::RemoveFormat => {
                self.dom
                    .remove_formatting(start, end, ContainerNode::is_formatting);
            }
            Command::Unwrap(tag) => {
                self.dom.remove_formatting(start, end, |c| {
                    c.name().eq_ignore_ascii_case(&tag)
                });
            }
            Command::Native(native) => self.toggle_native(native, start, end),
            Command::InsertHtml(html) => self.insert_html(&html, start, end),
        }
        self.dom.assert_invariants();
        self.emit(RegionEvent::ContentChanged);
        Ok(())
    }

    fn get_markup(&self) -> String {
        self.dom.to_html()
    }

    fn set_markup(&mut self, markup: &str) {
        self.dom = parse_markup(markup);
        let len = self.dom.text_len();
        self.selection_start = self.selection_start.min(len);
        self.selection_end = self.selection_end.min(len);
    }

    fn lock_active(&mut self, locked: bool) {
        debug!("region active-lock: {locked}");
        self.keep_active = locked;
    }

    fn focus(&mut self) {
        self.focused = true;
        self.activate();
    }

    fn notify_content_changed(&mut self) {
        self.emit(RegionEvent::ContentChanged);
    }

    fn subscribe(&mut self, listener: RegionListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Parse markup the way a browser assigning `innerHTML` would: never fail,
/// recover from errors and say so in the log.
fn parse_markup(markup: &str) -> Dom {
    let (dom, errors) = parse_lenient(markup);
    if !errors.is_empty() {
        warn!(
            "recovered from {} parse error(s) in markup: {}",
            errors.len(),
            errors.join("; ")
        );
    }
    dom
}
