// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The dialog that lets a user edit the region's markup directly.
//!
//! While the dialog is open the region is locked active, so moving the
//! keyboard focus into the dialog does not deactivate the editor. Edits go
//! to a buffer owned by the dialog and only reach the region on
//! [`RawMarkupDialog::commit`]. Closing discards whatever was not committed.

use log::debug;

use crate::localization::DialogLabels;
use crate::region::{EditableRegion, RegionEvent};

/// A rectangle in document coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Where the editor's parts are on the page when the dialog opens.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layout {
    pub region: Rect,
    pub toolbar: Rect,
    pub scroll: ScrollOffset,
}

/// Top-left corner of the dialog in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DialogPosition {
    pub left: f64,
    pub top: f64,
}

impl Layout {
    /// Right of the region, level with the toolbar.
    pub fn dialog_position(&self) -> DialogPosition {
        DialogPosition {
            left: self.region.x + self.region.width - self.scroll.x,
            top: self.toolbar.y - self.scroll.y,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DialogSession {
    buffered_markup: String,
    position: DialogPosition,
}

impl DialogSession {
    pub fn buffered_markup(&self) -> &str {
        &self.buffered_markup
    }

    pub fn position(&self) -> DialogPosition {
        self.position
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DialogState {
    #[default]
    Closed,
    Open(DialogSession),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawMarkupDialog {
    labels: DialogLabels,
    state: DialogState,
    button_checked: bool,
}

impl RawMarkupDialog {
    pub fn new(labels: DialogLabels) -> Self {
        Self {
            labels,
            state: DialogState::Closed,
            button_checked: false,
        }
    }

    pub fn labels(&self) -> DialogLabels {
        self.labels
    }

    /// Heading of the dialog, also used as the toolbar button's label.
    pub fn title(&self) -> &'static str {
        self.labels.title
    }

    /// Label of the button that commits the buffer.
    pub fn update_label(&self) -> &'static str {
        self.labels.update
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    /// Whether the toolbar button that opens the dialog shows as checked.
    pub fn is_button_checked(&self) -> bool {
        self.button_checked
    }

    pub fn position(&self) -> Option<DialogPosition> {
        match &self.state {
            DialogState::Open(session) => Some(session.position),
            DialogState::Closed => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match &self.state {
            DialogState::Open(session) => Some(&session.buffered_markup),
            DialogState::Closed => None,
        }
    }

    pub fn toggle<R>(&mut self, region: &mut R, layout: &Layout)
    where
        R: EditableRegion + ?Sized,
    {
        if self.is_open() {
            self.close(region);
        } else {
            self.open(region, layout);
        }
    }

    /// Open the dialog with the region's current markup in the buffer. Does
    /// nothing if it is already open.
    pub fn open<R>(&mut self, region: &mut R, layout: &Layout)
    where
        R: EditableRegion + ?Sized,
    {
        if self.is_open() {
            return;
        }
        let position = layout.dialog_position();
        region.lock_active(true);
        let buffered_markup = region.get_markup();
        debug!(
            "raw markup dialog opened at ({}, {}) with {} bytes",
            position.left,
            position.top,
            buffered_markup.len()
        );
        self.state = DialogState::Open(DialogSession {
            buffered_markup,
            position,
        });
        self.button_checked = true;
    }

    /// Replace the buffer. Returns false, leaving everything as it was, if
    /// the dialog is closed.
    pub fn edit_buffer(&mut self, markup: impl Into<String>) -> bool {
        match &mut self.state {
            DialogState::Open(session) => {
                session.buffered_markup = markup.into();
                true
            }
            DialogState::Closed => false,
        }
    }

    /// Write the buffer into the region and tell its listeners. The dialog
    /// stays open. Returns false if there was nothing to commit.
    pub fn commit<R>(&mut self, region: &mut R) -> bool
    where
        R: EditableRegion + ?Sized,
    {
        let DialogState::Open(session) = &self.state else {
            return false;
        };
        debug!("committing raw markup");
        region.set_markup(&session.buffered_markup);
        region.notify_content_changed();
        true
    }

    /// Close the dialog, discarding uncommitted edits, and hand the focus
    /// back to the region. Does nothing if already closed.
    pub fn close<R>(&mut self, region: &mut R)
    where
        R: EditableRegion + ?Sized,
    {
        if !self.is_open() {
            return;
        }
        debug!("raw markup dialog closed");
        self.state = DialogState::Closed;
        self.button_checked = false;
        region.focus();
        region.lock_active(false);
    }

    pub fn handle_region_event<R>(&mut self, region: &mut R, event: &RegionEvent)
    where
        R: EditableRegion + ?Sized,
    {
        if *event == RegionEvent::Deactivated && self.is_open() {
            debug!("region deactivated, discarding raw markup dialog");
            self.close(region);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::localization::dialog_labels;
    use crate::region::HtmlRegion;

    fn dialog() -> RawMarkupDialog {
        RawMarkupDialog::new(dialog_labels("en").unwrap())
    }

    fn layout() -> Layout {
        Layout {
            region: Rect::new(100.0, 200.0, 600.0, 300.0),
            toolbar: Rect::new(100.0, 150.0, 600.0, 40.0),
            scroll: ScrollOffset { x: 10.0, y: 50.0 },
        }
    }

    #[test]
    fn dialog_sits_right_of_the_region_level_with_the_toolbar() {
        assert_eq!(
            layout().dialog_position(),
            DialogPosition {
                left: 690.0,
                top: 100.0
            }
        );
    }

    #[test]
    fn labels_follow_the_configured_language() {
        let german = RawMarkupDialog::new(dialog_labels("de").unwrap());
        assert_eq!(german.title(), "HTML bearbeiten");
        assert_eq!(german.update_label(), "Aktualisieren");
        assert_eq!(dialog().update_label(), "Update");
    }

    #[test]
    fn open_loads_markup_and_locks_the_region() {
        let mut region = HtmlRegion::from_html("<p>x</p>");
        let mut dialog = dialog();
        dialog.open(&mut region, &layout());
        assert_eq!(dialog.buffer(), Some("<p>x</p>"));
        assert!(region.is_locked_active());
        assert!(dialog.is_button_checked());
        assert_eq!(dialog.position().map(|p| p.top), Some(100.0));
    }

    #[test]
    fn opening_twice_keeps_the_buffer() {
        let mut region = HtmlRegion::from_html("<p>x</p>");
        let mut dialog = dialog();
        dialog.open(&mut region, &layout());
        dialog.edit_buffer("<p>edited</p>");
        dialog.open(&mut region, &layout());
        assert_eq!(dialog.buffer(), Some("<p>edited</p>"));
    }

    #[test]
    fn toggle_alternates_between_open_and_closed() {
        let mut region = HtmlRegion::from_html("<p>x</p>");
        let mut dialog = dialog();
        dialog.toggle(&mut region, &layout());
        assert!(dialog.is_open());
        dialog.toggle(&mut region, &layout());
        assert!(!dialog.is_open());
        assert!(!region.is_locked_active());
    }

    #[test]
    fn commit_keeps_the_dialog_open() {
        let mut region = HtmlRegion::from_html("<p>x</p>");
        let mut dialog = dialog();
        dialog.open(&mut region, &layout());
        dialog.edit_buffer("<p>y</p>");
        assert!(dialog.commit(&mut region));
        assert!(dialog.is_open());
        assert_eq!(region.get_markup(), "<p>y</p>");
        assert!(dialog.commit(&mut region));
        assert_eq!(region.get_markup(), "<p>y</p>");
    }

    #[test]
    fn closed_dialog_ignores_edits_and_commits() {
        let mut region = HtmlRegion::from_html("<p>x</p>");
        let mut dialog = dialog();
        assert!(!dialog.edit_buffer("<p>y</p>"));
        assert!(!dialog.commit(&mut region));
        assert_eq!(region.get_markup(), "<p>x</p>");
    }

    #[test]
    fn close_refocuses_and_unlocks_the_region() {
        let mut region = HtmlRegion::from_html("<p>x</p>");
        let mut dialog = dialog();
        dialog.open(&mut region, &layout());
        region.blur();
        dialog.close(&mut region);
        assert!(region.has_focus());
        assert!(!region.is_locked_active());
        assert!(!dialog.is_button_checked());
        assert_eq!(dialog.buffer(), None);
    }

    #[test]
    fn other_region_events_leave_the_dialog_open() {
        let mut region = HtmlRegion::from_html("<p>x</p>");
        let mut dialog = dialog();
        dialog.open(&mut region, &layout());
        dialog.handle_region_event(&mut region, &RegionEvent::ContentChanged);
        dialog.handle_region_event(&mut region, &RegionEvent::Activated);
        assert!(dialog.is_open());
    }
}
