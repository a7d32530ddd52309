// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live robot collection subscriptions.
//!
//! A [`FeedPublisher`] holds the latest full snapshot of the robot table in a
//! `tokio::sync::watch` channel. Stores call [`FeedPublisher::publish`] after
//! every committed mutation; each [`RobotFeed`] yields the snapshot current at
//! subscription time first, then every newer snapshot. Intermediate snapshots
//! may be coalesced for slow readers, but a reader never observes a snapshot
//! older than the last one it was handed.

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::Robot;

/// An immutable, shareable copy of the robot table.
pub type Snapshot = Arc<Vec<Robot>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    All,
    Active,
}

impl Scope {
    fn apply(self, robots: &[Robot]) -> Vec<Robot> {
        match self {
            Scope::All => robots.to_vec(),
            Scope::Active => robots.iter().filter(|r| r.is_active).cloned().collect(),
        }
    }
}

/// Producer side of the live subscription.
#[derive(Debug, Clone)]
pub struct FeedPublisher {
    tx: Arc<watch::Sender<Snapshot>>,
}

impl FeedPublisher {
    /// Creates a publisher seeded with an initial snapshot.
    pub fn new(initial: Vec<Robot>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    /// Replaces the snapshot and wakes every subscriber.
    ///
    /// Publishes even when nobody is subscribed, so later subscribers start
    /// from the newest state.
    pub fn publish(&self, robots: Vec<Robot>) {
        self.tx.send_replace(Arc::new(robots));
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Subscribes to the full collection.
    pub fn subscribe_all(&self) -> RobotFeed {
        RobotFeed::new(self.tx.subscribe(), Scope::All)
    }

    /// Subscribes to the robots with `is_active == true`.
    pub fn subscribe_active(&self) -> RobotFeed {
        RobotFeed::new(self.tx.subscribe(), Scope::Active)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Consumer side of the live subscription.
#[derive(Debug)]
pub struct RobotFeed {
    rx: watch::Receiver<Snapshot>,
    scope: Scope,
    primed: bool,
}

impl RobotFeed {
    fn new(rx: watch::Receiver<Snapshot>, scope: Scope) -> Self {
        Self {
            rx,
            scope,
            primed: false,
        }
    }

    /// The latest snapshot without waiting.
    pub fn current(&self) -> Vec<Robot> {
        self.scope.apply(&self.rx.borrow())
    }

    /// Waits for the next snapshot.
    ///
    /// The first call returns immediately with the current snapshot. Returns
    /// `None` once the publishing store has been dropped.
    pub async fn next(&mut self) -> Option<Vec<Robot>> {
        if !self.primed {
            self.primed = true;
            let snapshot = self.rx.borrow_and_update().clone();
            return Some(self.scope.apply(&snapshot));
        }
        self.rx.changed().await.ok()?;
        let snapshot = self.rx.borrow_and_update().clone();
        Some(self.scope.apply(&snapshot))
    }
}
