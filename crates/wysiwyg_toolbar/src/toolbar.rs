// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;
use strum_macros::Display;

use crate::config::{ConfigError, ToolbarConfig};
use crate::localization::dialog_labels;
use crate::raw_markup_dialog::{Layout, RawMarkupDialog};
use crate::region::{EditableRegion, ListenerId, RegionEvent};
use crate::toggle_button::ToggleButton;

const RAW_MARKUP_ICON: &str = "fa fa-file-code";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ButtonId {
    /// The toggle button for this element.
    Toggle(String),
    RawMarkup,
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonId::Toggle(tag_name) => write!(f, "toggle:{tag_name}"),
            ButtonId::RawMarkup => f.write_str("raw-markup"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ButtonKind {
    Toggle,
    Dialog,
}

/// What the host needs to render one toolbar button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolbarButton {
    pub id: ButtonId,
    pub label: String,
    pub icon: String,
    pub kind: ButtonKind,
}

/// Anything the toolbar can put its buttons into.
pub trait ToolbarContainer {
    fn add_button(&mut self, button: ToolbarButton);
}

impl ToolbarContainer for Vec<ToolbarButton> {
    fn add_button(&mut self, button: ToolbarButton) {
        self.push(button);
    }
}

/// Collects the events a region emits so they can be handed to a
/// [`Toolbar`] once the region is free again.
///
/// Listeners run while the region is mutably borrowed, so they cannot call
/// back into the toolbar with it. The queue records instead, and
/// [`Toolbar::process_events`] delivers afterwards.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Rc<RefCell<Vec<RegionEvent>>>,
}

impl EventQueue {
    /// Subscribe a new queue to `region`. Keep the id to unsubscribe.
    pub fn attach<R>(region: &mut R) -> (Self, ListenerId)
    where
        R: EditableRegion + ?Sized,
    {
        let queue = Self::default();
        let sink = Rc::clone(&queue.events);
        let id = region.subscribe(Box::new(move |event: &RegionEvent| {
            sink.borrow_mut().push(*event)
        }));
        (queue, id)
    }

    /// Take every recorded event, oldest first.
    pub fn drain(&self) -> Vec<RegionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// All the controllers attached to one editable region.
///
/// The toolbar does not subscribe to the region itself. The host either
/// forwards each event to [`Toolbar::handle_event`], or attaches an
/// [`EventQueue`] and calls [`Toolbar::process_events`] after each
/// interaction with the region.
#[derive(Clone, Debug, PartialEq)]
pub struct Toolbar {
    buttons: Vec<ToggleButton>,
    dialog: Option<RawMarkupDialog>,
}

impl Toolbar {
    pub fn new(config: &ToolbarConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let buttons = config
            .buttons
            .iter()
            .map(|spec| ToggleButton::new(spec.clone(), config.unwrap_scope))
            .collect();
        let dialog = if config.raw_markup_button {
            let labels = dialog_labels(&config.language).ok_or_else(|| {
                ConfigError::UnknownLanguage(config.language.clone())
            })?;
            Some(RawMarkupDialog::new(labels))
        } else {
            None
        };
        Ok(Self { buttons, dialog })
    }

    pub fn buttons(&self) -> &[ToggleButton] {
        &self.buttons
    }

    pub fn button(&self, tag_name: &str) -> Option<&ToggleButton> {
        self.buttons
            .iter()
            .find(|b| b.tag_name().eq_ignore_ascii_case(tag_name))
    }

    pub fn dialog(&self) -> Option<&RawMarkupDialog> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut RawMarkupDialog> {
        self.dialog.as_mut()
    }

    /// Add one button per controller to `container`, in configuration
    /// order with the raw markup button last.
    pub fn populate_toolbar<C>(&self, container: &mut C)
    where
        C: ToolbarContainer + ?Sized,
    {
        for button in &self.buttons {
            let spec = button.spec();
            container.add_button(ToolbarButton {
                id: ButtonId::Toggle(spec.tag_name.clone()),
                label: spec.label.clone(),
                icon: spec.icon.clone(),
                kind: ButtonKind::Toggle,
            });
        }
        if let Some(dialog) = &self.dialog {
            container.add_button(ToolbarButton {
                id: ButtonId::RawMarkup,
                label: dialog.title().to_owned(),
                icon: RAW_MARKUP_ICON.to_owned(),
                kind: ButtonKind::Dialog,
            });
        }
    }

    /// The checked indicator of every button, in toolbar order, computed
    /// from a fresh selection.
    pub fn refresh<R>(&self, region: &R) -> Vec<(ButtonId, bool)>
    where
        R: EditableRegion + ?Sized,
    {
        let selection = region.get_selection();
        let mut states: Vec<(ButtonId, bool)> = self
            .buttons
            .iter()
            .map(|button| {
                (
                    ButtonId::Toggle(button.tag_name().to_owned()),
                    button.state_for(&selection).is_checked(),
                )
            })
            .collect();
        if let Some(dialog) = &self.dialog {
            states.push((ButtonId::RawMarkup, dialog.is_button_checked()));
        }
        states
    }

    /// Route a click to its controller. Returns false if no button has
    /// this id.
    pub fn click<R>(&mut self, id: &ButtonId, region: &mut R, layout: &Layout) -> bool
    where
        R: EditableRegion + ?Sized,
    {
        match id {
            ButtonId::Toggle(tag_name) => match self.button(tag_name) {
                Some(button) => {
                    let command = button.on_click(region);
                    debug!("{id} issued {}", command.name());
                    true
                }
                None => {
                    debug!("click on unknown button {id}");
                    false
                }
            },
            ButtonId::RawMarkup => match &mut self.dialog {
                Some(dialog) => {
                    dialog.toggle(region, layout);
                    true
                }
                None => false,
            },
        }
    }

    /// Forward a notification from the region to the controllers that care.
    pub fn handle_event<R>(&mut self, region: &mut R, event: &RegionEvent)
    where
        R: EditableRegion + ?Sized,
    {
        if let Some(dialog) = &mut self.dialog {
            dialog.handle_region_event(region, event);
        }
    }

    /// Deliver everything `queue` recorded since the last call. Events
    /// raised while handling them are left for the next call.
    pub fn process_events<R>(&mut self, region: &mut R, queue: &EventQueue)
    where
        R: EditableRegion + ?Sized,
    {
        for event in queue.drain() {
            self.handle_event(region, &event);
        }
    }
}
