// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Texts shown by the raw markup dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialogLabels {
    pub title: &'static str,
    pub update: &'static str,
}

static DIALOG_LABELS: Lazy<HashMap<&'static str, DialogLabels>> =
    Lazy::new(|| {
        HashMap::from([
            (
                "en",
                DialogLabels {
                    title: "Edit HTML",
                    update: "Update",
                },
            ),
            (
                "de",
                DialogLabels {
                    title: "HTML bearbeiten",
                    update: "Aktualisieren",
                },
            ),
            (
                "fr",
                DialogLabels {
                    title: "Modifier le HTML",
                    update: "Mettre à jour",
                },
            ),
            (
                "nl",
                DialogLabels {
                    title: "HTML bewerken",
                    update: "Bijwerken",
                },
            ),
        ])
    });

/// Labels for `language`, `None` if there is no translation for it.
pub fn dialog_labels(language: &str) -> Option<DialogLabels> {
    DIALOG_LABELS.get(language).copied()
}

/// Every language with dialog labels, sorted.
pub fn supported_languages() -> Vec<&'static str> {
    let mut languages: Vec<&'static str> =
        DIALOG_LABELS.keys().copied().collect();
    languages.sort_unstable();
    languages
}
