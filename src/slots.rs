use crate::trace::error;
use std::{num::NonZeroUsize, process};

/// State of a single slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SlotState {
    /// Holds a value that can be selected for write.
    Free,
    /// Holds the most recently dispatched value, not yet acquired.
    Pending,
    /// Value is checked out by a write guard.
    Writing,
    /// Value is checked out by a read guard.
    Reading,
}

/// Counters of exchange activity since construction.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Stats {
    /// Values published by write guards.
    pub dispatched: u64,
    /// Pending values replaced by a newer dispatch before any reader took them.
    pub overwritten: u64,
    /// Write guards returned without publishing.
    pub cancelled: u64,
    /// Pending values taken by readers.
    pub acquired: u64,
    /// Values returned by read guards.
    pub released: u64,
}

/// Slot pool bookkeeping.
///
/// Not synchronized by itself, every method is a critical section of the exchange.
pub(crate) struct Slots<T> {
    len: NonZeroUsize,
    items: Box<[Option<T>]>,
    reading: Box<[bool]>,
    pending: Option<usize>,
    stopped: bool,
    stats: Stats,
}

/// Conservation of values is broken, nothing sensible can be done anymore.
#[cold]
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn broken(what: &str, index: usize) -> ! {
    error!(slot = index, "slot bookkeeping is corrupted: {}", what);
    process::abort()
}

impl<T> Slots<T> {
    /// # Panics
    ///
    /// Panics if `items` is empty.
    pub fn new(items: Vec<T>) -> Self {
        let Some(len) = NonZeroUsize::new(items.len()) else {
            panic!("exchange must have at least one slot");
        };
        Self {
            len,
            reading: vec![false; len.get()].into_boxed_slice(),
            items: items.into_iter().map(Some).collect(),
            pending: None,
            stopped: false,
            stats: Stats::default(),
        }
    }

    pub fn len(&self) -> NonZeroUsize {
        self.len
    }

    pub fn state(&self, index: usize) -> SlotState {
        match (&self.items[index], self.reading[index]) {
            (Some(_), _) if self.pending == Some(index) => SlotState::Pending,
            (Some(_), _) => SlotState::Free,
            (None, true) => SlotState::Reading,
            (None, false) => SlotState::Writing,
        }
    }

    pub fn states(&self) -> Vec<SlotState> {
        (0..self.items.len()).map(|i| self.state(i)).collect()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Take a value that is neither pending nor checked out.
    ///
    /// Returns `None` if every slot is pending, being read or being written.
    pub fn select(&mut self) -> Option<(usize, T)> {
        let index = (0..self.items.len()).find(|&i| self.state(i) == SlotState::Free)?;
        let value = self.items[index].take()?;
        Some((index, value))
    }

    /// Put written value back into its slot and make it pending.
    ///
    /// Previously pending value stays in its slot and becomes free.
    /// Returns whether such an undelivered value existed.
    pub fn dispatch(&mut self, index: usize, value: T) -> bool {
        self.put(index, value);
        self.stats.dispatched += 1;
        let overwritten = self.pending.replace(index).is_some();
        if overwritten {
            self.stats.overwritten += 1;
        }
        overwritten
    }

    /// Put written value back into its slot without publishing it.
    pub fn cancel(&mut self, index: usize, value: T) {
        self.put(index, value);
        self.stats.cancelled += 1;
    }

    /// Take pending value and mark its slot as being read.
    pub fn take_pending(&mut self) -> Option<(usize, T)> {
        let index = self.pending.take()?;
        let value = match self.items[index].take() {
            Some(value) => value,
            None => broken("pending slot is empty", index),
        };
        self.reading[index] = true;
        self.stats.acquired += 1;
        Some((index, value))
    }

    /// Return value taken by [`Self::take_pending`] to the slot it came from.
    pub fn release(&mut self, index: usize, value: T) {
        if !self.reading[index] {
            broken("released slot is not being read", index);
        }
        self.put(index, value);
        self.reading[index] = false;
        self.stats.released += 1;
    }

    fn put(&mut self, index: usize, value: T) {
        if self.items[index].is_some() {
            broken("returned value into occupied slot", index);
        }
        self.items[index] = Some(value);
    }
}
