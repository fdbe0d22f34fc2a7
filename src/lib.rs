//! Fixed-slot buffer exchange passing the freshest written value between threads.
//!
//! Writers borrow a free slot, fill it in place and dispatch it as the *pending* buffer.
//! Readers block until there is a pending buffer and borrow it.
//! Only the latest dispatched value is kept pending: an older one that nobody acquired yet
//! goes back to the pool of free slots. Values are moved between slots and guards, never copied.
//!
//! Neither writers nor readers ever wait for each other while holding a value.
//! The only blocking operation is [`Exchange::acquire`], which can be cancelled forever by [`Exchange::stop`].
//!
//! ```
//! use freshbuf::Exchange;
//!
//! let exchange = Exchange::new(3, || vec![0u8; 16]);
//!
//! let mut frame = exchange.select().unwrap();
//! frame.fill(1);
//! drop(frame);
//!
//! let mut frame = exchange.select().unwrap();
//! frame.fill(2);
//! frame.dispatch();
//!
//! let frame = exchange.acquire().unwrap();
//! assert!(frame.iter().all(|&x| x == 2));
//! drop(frame);
//!
//! exchange.stop();
//! assert!(exchange.acquire().is_none());
//! ```

mod alias;
mod error;
mod exchange;
mod guard;
mod slots;
mod trace;

pub use error::WaitError;
pub use exchange::Exchange;
pub use guard::{ReadGuard, WriteGuard};
pub use slots::{SlotState, Stats};
pub use trace::init_tracing;

#[cfg(test)]
mod tests;
