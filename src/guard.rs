use crate::exchange::Exchange;
use core::{
    fmt,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};
use std::thread;

/// Exclusive access to a value selected for writing.
///
/// Dropping the guard dispatches the value as the new pending buffer.
/// If the guard is dropped while the thread is panicking, the value is returned without dispatch,
/// so a partially written value never reaches readers.
pub struct WriteGuard<T> {
    exchange: Exchange<T>,
    index: usize,
    value: ManuallyDrop<T>,
    cancelled: bool,
}

impl<T> WriteGuard<T> {
    pub(crate) fn new(exchange: Exchange<T>, index: usize, value: T) -> Self {
        Self {
            exchange,
            index,
            value: ManuallyDrop::new(value),
            cancelled: false,
        }
    }

    /// Index of the slot the value was taken from.
    pub fn slot(&self) -> usize {
        self.index
    }

    /// Exchange the value belongs to.
    pub fn exchange(&self) -> &Exchange<T> {
        &self.exchange
    }

    /// Dispatches the value, same as dropping the guard.
    pub fn dispatch(self) {}

    /// Returns the value to its slot without dispatching it.
    ///
    /// Readers are not woken, current pending value (if any) stays pending.
    pub fn cancel(mut self) {
        self.cancelled = true;
    }
}

impl<T> Deref for WriteGuard<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.value
    }
}
impl<T> DerefMut for WriteGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Drop for WriteGuard<T> {
    fn drop(&mut self) {
        // SAFETY: `value` is not accessed after this point.
        let value = unsafe { ManuallyDrop::take(&mut self.value) };
        if self.cancelled || thread::panicking() {
            self.exchange.cancel(self.index, value);
        } else {
            self.exchange.dispatch(self.index, value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for WriteGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteGuard")
            .field("slot", &self.index)
            .field("value", &*self.value)
            .finish()
    }
}

/// Exclusive access to an acquired value.
///
/// Dropping the guard returns the value to the slot it was acquired from.
pub struct ReadGuard<T> {
    exchange: Exchange<T>,
    index: usize,
    value: ManuallyDrop<T>,
}

impl<T> ReadGuard<T> {
    pub(crate) fn new(exchange: Exchange<T>, index: usize, value: T) -> Self {
        Self {
            exchange,
            index,
            value: ManuallyDrop::new(value),
        }
    }

    /// Index of the slot the value was acquired from.
    pub fn slot(&self) -> usize {
        self.index
    }

    /// Exchange the value belongs to.
    pub fn exchange(&self) -> &Exchange<T> {
        &self.exchange
    }

    /// Returns the value to the exchange, same as dropping the guard.
    pub fn release(self) {}
}

impl<T> Deref for ReadGuard<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.value
    }
}
impl<T> DerefMut for ReadGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Drop for ReadGuard<T> {
    fn drop(&mut self) {
        // SAFETY: `value` is not accessed after this point.
        let value = unsafe { ManuallyDrop::take(&mut self.value) };
        self.exchange.release(self.index, value);
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadGuard")
            .field("slot", &self.index)
            .field("value", &*self.value)
            .finish()
    }
}
