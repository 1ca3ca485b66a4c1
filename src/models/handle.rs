// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Write-once model handle shared between the startup loader and request handlers

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("model handle already holds a loaded model")]
pub struct ModelAlreadyLoaded;

/// Shared slot for a loaded model
///
/// Starts empty, is filled exactly once by the loader and is never cleared.
/// Cloning is cheap; all clones observe the same slot. Reads are lock-free.
pub struct ModelHandle<M: ?Sized> {
    cell: Arc<OnceCell<Arc<M>>>,
}

impl<M: ?Sized> ModelHandle<M> {
    /// Creates a handle in the "not loaded" state
    pub fn empty() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Creates a handle that already holds a model
    pub fn loaded(model: Arc<M>) -> Self {
        Self {
            cell: Arc::new(OnceCell::new_with(Some(model))),
        }
    }

    /// Stores the loaded model; a second call is rejected and the first model stays
    pub fn set(&self, model: Arc<M>) -> Result<(), ModelAlreadyLoaded> {
        self.cell.set(model).map_err(|_| ModelAlreadyLoaded)
    }

    /// Returns the model, or `None` while it is not loaded
    pub fn get(&self) -> Option<Arc<M>> {
        self.cell.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }
}

impl<M: ?Sized> Clone for ModelHandle<M> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<M: ?Sized> Default for ModelHandle<M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<M: ?Sized> fmt::Debug for ModelHandle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}
