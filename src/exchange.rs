use crate::{
    alias::Arc,
    error::WaitError,
    guard::{ReadGuard, WriteGuard},
    slots::{SlotState, Slots, Stats},
    trace::{debug, trace},
};
use core::{fmt, iter, num::NonZeroUsize, time::Duration};
use crossbeam_utils::CachePadded;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct Shared<T> {
    slots: CachePadded<Mutex<Slots<T>>>,
    ready: Condvar,
}

/// Fixed set of slots passing the freshest written value from writers to readers.
///
/// Writers [`select`](Self::select) a free slot, fill it and dispatch it by dropping the guard.
/// Readers [`acquire`](Self::acquire) the most recently dispatched value, blocking until there is one.
/// A dispatched value that nobody acquired before the next dispatch is silently recycled.
///
/// Values are never copied: each of the `N` values is owned either by the exchange or by exactly one guard.
///
/// The exchange is a cheap handle, clones refer to the same slots.
/// Guards keep the slots alive, so the exchange may be dropped while guards are still outstanding.
///
/// ```
/// use std::thread;
/// use freshbuf::Exchange;
///
/// let exchange = Exchange::from_values([1, 2, 3]);
/// let writer = exchange.clone();
/// thread::spawn(move || {
///     let mut buf = writer.select().unwrap();
///     *buf = 42;
/// })
/// .join()
/// .unwrap();
/// assert_eq!(*exchange.acquire().unwrap(), 42);
/// ```
pub struct Exchange<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Exchange<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Exchange<T> {
    /// Creates exchange with `count` slots, each filled by calling `init`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn new<F: FnMut() -> T>(count: usize, init: F) -> Self {
        Self::from_values(iter::repeat_with(init).take(count))
    }

    /// Creates exchange with one slot per value.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        Self {
            shared: Arc::new(Shared {
                slots: CachePadded::new(Mutex::new(Slots::new(values.into_iter().collect()))),
                ready: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        // Critical sections never call user code, so poisoned state is still consistent.
        self.shared.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of slots.
    ///
    /// It is constant during the whole exchange lifetime.
    pub fn slot_count(&self) -> NonZeroUsize {
        self.lock().len()
    }

    /// Borrows a value for writing.
    ///
    /// Never blocks. Returns `None` if every slot is pending, being read or being written;
    /// the caller decides whether and when to retry.
    ///
    /// The value is dispatched as the new pending buffer when the guard is dropped.
    pub fn select(&self) -> Option<WriteGuard<T>> {
        let taken = self.lock().select();
        match taken {
            Some((index, value)) => Some(WriteGuard::new(self.clone(), index, value)),
            None => {
                trace!("no free slot to select");
                None
            }
        }
    }

    /// Borrows the pending value for reading, blocking until there is one.
    ///
    /// Returns `None` once the exchange is [stopped](Self::stop), the caller should exit its read loop.
    pub fn acquire(&self) -> Option<ReadGuard<T>> {
        self.acquire_timeout(None).ok()
    }

    /// Borrows the pending value for reading if there is one.
    ///
    /// Never blocks. Returns `None` if nothing is pending or the exchange is stopped.
    pub fn try_acquire(&self) -> Option<ReadGuard<T>> {
        let mut slots = self.lock();
        self.take_pending(&mut slots).ok().flatten()
    }

    /// Borrows the pending value for reading, blocking at most for `timeout`.
    ///
    /// `None` timeout means waiting forever.
    pub fn acquire_timeout(&self, timeout: Option<Duration>) -> Result<ReadGuard<T>, WaitError> {
        let blocked = |slots: &mut Slots<T>| !slots.is_stopped() && !slots.has_pending();
        let slots = self.lock();
        let mut slots = match timeout {
            Some(t) => {
                self.shared
                    .ready
                    .wait_timeout_while(slots, t, blocked)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
            None => self.shared.ready.wait_while(slots, blocked).unwrap_or_else(PoisonError::into_inner),
        };
        self.take_pending(&mut slots)?.ok_or(WaitError::TimedOut)
    }

    fn take_pending(&self, slots: &mut Slots<T>) -> Result<Option<ReadGuard<T>>, WaitError> {
        if slots.is_stopped() {
            debug!("acquisition cancelled, exchange is stopped");
            return Err(WaitError::Stopped);
        }
        Ok(slots
            .take_pending()
            .map(|(index, value)| ReadGuard::new(self.clone(), index, value)))
    }

    /// Stops the exchange permanently.
    ///
    /// Wakes every blocked reader, current and future acquisitions return `None`.
    /// Writers are not affected.
    pub fn stop(&self) {
        self.lock().stop();
        debug!("exchange stopped");
        self.shared.ready.notify_all();
    }

    /// Whether [`Self::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.lock().is_stopped()
    }

    /// Whether there is a dispatched value not acquired yet.
    ///
    /// *The result may become irrelevant at any time because of concurring writers or readers.*
    pub fn has_pending(&self) -> bool {
        self.lock().has_pending()
    }

    /// Snapshot of every slot state, in slot order.
    ///
    /// *The result may become irrelevant at any time because of concurring writers or readers.*
    pub fn slot_states(&self) -> Vec<SlotState> {
        self.lock().states()
    }

    /// Snapshot of activity counters.
    pub fn stats(&self) -> Stats {
        self.lock().stats()
    }

    pub(crate) fn dispatch(&self, index: usize, value: T) {
        let overwritten = self.lock().dispatch(index, value);
        if overwritten {
            trace!(slot = index, "undelivered buffer overwritten");
        }
        self.shared.ready.notify_one();
    }

    pub(crate) fn cancel(&self, index: usize, value: T) {
        self.lock().cancel(index, value);
        trace!(slot = index, "write cancelled");
    }

    pub(crate) fn release(&self, index: usize, value: T) {
        self.lock().release(index, value);
    }
}

impl<T: Clone> Exchange<T> {
    /// Creates exchange with `count` slots holding clones of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn filled(count: usize, value: T) -> Self {
        Self::new(count, || value.clone())
    }
}

impl<T: Default> Exchange<T> {
    /// Creates exchange with `count` default-constructed slots.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn with_default(count: usize) -> Self {
        Self::new(count, T::default)
    }
}

impl<T> fmt::Debug for Exchange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.lock();
        f.debug_struct("Exchange")
            .field("slots", &slots.states())
            .field("stopped", &slots.is_stopped())
            .finish()
    }
}
