//! Snapshot-based undo/redo over an opaque document value.
//!
//! Every edit clones the present document, transforms the clone by value and
//! installs the result, so snapshots held in the past/future stacks are never
//! aliased. Edits come in two flavours:
//!
//! - `set` records the current document as an undo point before applying.
//! - `mutate` applies without recording; a gesture calls `checkpoint` once and
//!   then `mutate` for each step so the whole gesture undoes in one step.
//!
//! After `undo`/`redo` a navigation lock suppresses new undo points until the
//! owner ends the current turn with `tick`, so a caller reacting to the
//! navigation cannot fork a spurious branch.

use std::{collections::VecDeque, time::Instant};

use log::{debug, info};

use crate::persist::{Persist, Persister};

pub struct History<D> {
    past: VecDeque<D>,
    present: D,
    future: VecDeque<D>,
    limit: usize,
    nav_lock: bool,
    persister: Option<Persister>,
}

impl<D: Clone> History<D> {
    pub fn new(initial: D, limit: usize) -> Self {
        History {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
            limit,
            nav_lock: false,
            persister: None,
        }
    }

    pub fn present(&self) -> &D {
        &self.present
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_nav_locked(&self) -> bool {
        self.nav_lock
    }

    pub fn is_persist_pending(&self) -> bool {
        self.persister.as_ref().is_some_and(|p| p.is_pending())
    }

    /// Applies a live edit that does not become an undo point.
    pub fn mutate(&mut self, updater: impl FnOnce(D) -> D) {
        self.present = updater(self.present.clone());
        self.present_changed();
    }

    /// Applies a recorded edit, discarding any redo branch.
    pub fn set(&mut self, updater: impl FnOnce(D) -> D) {
        if self.nav_lock {
            self.mutate(updater);
            return;
        }
        let next = updater(self.present.clone());
        let prev = std::mem::replace(&mut self.present, next);
        self.push_past(prev);
        self.future.clear();
        self.present_changed();
    }

    /// Records the present as an undo point without changing it.
    pub fn checkpoint(&mut self) {
        if self.nav_lock {
            return;
        }
        self.push_past(self.present.clone());
        self.future.clear();
    }

    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop_back() else {
            return false;
        };
        let cur = std::mem::replace(&mut self.present, prev);
        self.future.push_front(cur);
        self.nav_lock = true;
        debug!("Undo ({} left, {} redoable)", self.past.len(), self.future.len());
        self.present_changed();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let cur = std::mem::replace(&mut self.present, next);
        self.push_past(cur);
        self.nav_lock = true;
        debug!("Redo ({} undoable, {} left)", self.past.len(), self.future.len());
        self.present_changed();
        true
    }

    /// Installs `doc` without touching either stack (e.g. after a load).
    pub fn replace(&mut self, doc: D) {
        self.present = doc;
        self.present_changed();
    }

    /// Drops both stacks, keeping the present.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Ends the current scheduling turn: lifts the navigation lock.
    pub fn end_turn(&mut self) {
        self.nav_lock = false;
    }

    fn push_past(&mut self, doc: D) {
        self.past.push_back(doc);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }

    fn present_changed(&mut self) {
        if let Some(persister) = &mut self.persister {
            persister.schedule(Instant::now());
        }
    }
}

impl<D: Clone + Persist> History<D> {
    /// Creates a history that persists its present through `persister`. A
    /// previously stored document replaces `initial` when it differs from it.
    pub fn hydrate(initial: D, limit: usize, persister: Persister) -> Self {
        let mut history = History::new(initial, limit);
        if let Some(stored) = persister.load::<D>() {
            let differs = match (stored.to_bytes(), history.present.to_bytes()) {
                (Ok(a), Ok(b)) => a != b,
                _ => true,
            };
            if differs {
                info!("Restored document from {}", persister.key());
                history.present = stored;
            }
        }
        history.persister = Some(persister);
        history
    }

    /// Ends the turn and performs the debounced write once its deadline has
    /// passed.
    pub fn tick(&mut self, now: Instant) {
        self.end_turn();
        if let Some(persister) = &mut self.persister {
            if persister.is_due(now) {
                persister.write(&self.present);
            }
        }
    }

    /// Writes any pending change immediately.
    pub fn flush(&mut self) {
        if let Some(persister) = &mut self.persister {
            if persister.is_pending() {
                persister.write(&self.present);
            }
        }
    }
}
