// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Toolbar configuration, fixed at setup time.
//!
//! A [`ToolbarConfig`] is usually deserialized from the JSON the host page
//! embeds, then checked once with [`ToolbarConfig::validate`]. Anything wrong
//! with it is reported there and never at runtime.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::localization::dialog_labels;
use crate::toggle_button::ToggleButtonSpec;

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z][a-z0-9]*$").unwrap());

/// What an enclosed toggle button removes when clicked.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UnwrapScope {
    /// Every inline format at the selection.
    #[default]
    AllFormatting,
    /// Only the button's own element.
    EnclosingTag,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no dialog labels for language `{0}`")]
    UnknownLanguage(String),
    #[error("`{0}` is not a valid tag name")]
    InvalidTagName(String),
    #[error("more than one button toggles `{0}`")]
    DuplicateButton(String),
    #[error("invalid toolbar configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    pub language: String,
    pub buttons: Vec<ToggleButtonSpec>,
    pub unwrap_scope: UnwrapScope,
    pub raw_markup_button: bool,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            language: String::from("en"),
            buttons: ToggleButtonSpec::builtins(),
            unwrap_scope: UnwrapScope::default(),
            raw_markup_button: true,
        }
    }
}

impl ToolbarConfig {
    /// Deserialize and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if dialog_labels(&self.language).is_none() {
            return Err(ConfigError::UnknownLanguage(self.language.clone()));
        }
        let mut seen = HashSet::new();
        for button in &self.buttons {
            if !TAG_NAME.is_match(&button.tag_name) {
                return Err(ConfigError::InvalidTagName(button.tag_name.clone()));
            }
            if !seen.insert(button.tag_name.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateButton(
                    button.tag_name.clone(),
                ));
            }
        }
        Ok(())
    }
}
