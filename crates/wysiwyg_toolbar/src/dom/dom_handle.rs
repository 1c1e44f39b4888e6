// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// The address of a node inside a [`crate::dom::Dom`]: the index of each
/// child taken on the way down from the document node. The document itself
/// is the empty path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomHandle {
    path: Vec<usize>,
}

impl DomHandle {
    pub fn root() -> Self {
        Self { path: Vec::new() }
    }

    pub fn from_raw(path: Vec<usize>) -> Self {
        Self { path }
    }

    pub fn raw(&self) -> &Vec<usize> {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn has_parent(&self) -> bool {
        !self.path.is_empty()
    }

    /// Handle of the parent node, `None` for the document node.
    pub fn parent_handle(&self) -> Option<DomHandle> {
        let (_, parent) = self.path.split_last()?;
        Some(Self::from_raw(parent.to_vec()))
    }

    pub fn index_in_parent(&self) -> Option<usize> {
        self.path.last().copied()
    }

    pub fn child_handle(&self, index: usize) -> DomHandle {
        let mut path = self.path.clone();
        path.push(index);
        Self::from_raw(path)
    }

    /// The deepest handle that is an ancestor-or-self of both handles.
    pub fn common_ancestor(&self, other: &DomHandle) -> DomHandle {
        let path = self
            .path
            .iter()
            .zip(other.path.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect();
        Self::from_raw(path)
    }

    /// All handles from the document node down to (and including) this one.
    pub fn with_ancestors(&self) -> Vec<DomHandle> {
        (0..=self.path.len())
            .map(|len| Self::from_raw(self.path[..len].to_vec()))
            .collect()
    }
}
