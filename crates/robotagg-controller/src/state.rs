// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observable controller state and the loading guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use robotagg_core::Robot;
use tokio::sync::watch;

/// Everything a presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Mirror of the store's full collection, newest first.
    pub robots: Vec<Robot>,
    /// True while at least one operation is in flight.
    pub loading: bool,
    /// One-shot message; the consumer reads it and calls `clear_message`.
    pub message: Option<String>,
    /// Outcome of the last connection test, until cleared.
    pub connection_result: Option<bool>,
}

/// Shared state cell plus the count of in-flight operations.
#[derive(Debug)]
pub(crate) struct StateCell {
    tx: watch::Sender<ViewState>,
    in_flight: AtomicUsize,
}

impl StateCell {
    pub(crate) fn new(initial: ViewState) -> Arc<Self> {
        let (tx, _rx) = watch::channel(initial);
        Arc::new(Self {
            tx,
            in_flight: AtomicUsize::new(0),
        })
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    pub(crate) fn borrow(&self) -> watch::Ref<'_, ViewState> {
        self.tx.borrow()
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut ViewState)) {
        self.tx.send_modify(f);
    }

    pub(crate) fn set_message(&self, message: String) {
        self.update(|s| s.message = Some(message));
    }

    /// Mark an operation in flight until the returned guard drops.
    pub(crate) fn begin_loading(self: &Arc<Self>) -> LoadingGuard {
        self.adjust_in_flight(true);
        LoadingGuard {
            cell: Arc::clone(self),
        }
    }

    // The counter is adjusted under the watch lock so the published flag
    // always agrees with the count.
    fn adjust_in_flight(&self, enter: bool) {
        self.tx.send_modify(|s| {
            let now = if enter {
                self.in_flight.fetch_add(1, Ordering::SeqCst) + 1
            } else {
                self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1
            };
            s.loading = now > 0;
        });
    }
}

/// Clears the loading flag when the last overlapping operation finishes,
/// including on early return and panic.
pub(crate) struct LoadingGuard {
    cell: Arc<StateCell>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.cell.adjust_in_flight(false);
    }
}
