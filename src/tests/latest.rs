use super::count_states;
use crate::{Exchange, SlotState};

#[test]
fn latest_wins() {
    let exchange = Exchange::from_values([0, 0, 0]);

    let mut buf = exchange.select().unwrap();
    *buf = 10;
    let old_slot = buf.slot();
    drop(buf);

    let mut buf = exchange.select().unwrap();
    *buf = 20;
    drop(buf);

    assert_eq!(exchange.slot_states()[old_slot], SlotState::Free);
    assert_eq!(exchange.stats().overwritten, 1);

    let buf = exchange.acquire().unwrap();
    assert_eq!(*buf, 20);
    assert_ne!(buf.slot(), old_slot);

    // Slot that held overwritten value is reused as is.
    let buf = exchange.select().unwrap();
    assert_eq!(buf.slot(), old_slot);
    assert_eq!(*buf, 10);
}

#[test]
fn overwritten_never_delivered() {
    let exchange = Exchange::from_values([0, 0, 0]);

    for value in 1..=100 {
        let mut buf = exchange.select().unwrap();
        *buf = value;
    }
    assert_eq!(count_states(&exchange, SlotState::Pending), 1);

    assert_eq!(*exchange.acquire().unwrap(), 100);
    assert!(exchange.try_acquire().is_none());
}

#[test]
fn dispatch_while_reading() {
    let exchange = Exchange::from_values([0, 0, 0]);

    let mut buf = exchange.select().unwrap();
    *buf = 1;
    drop(buf);
    let reading = exchange.acquire().unwrap();

    let mut buf = exchange.select().unwrap();
    *buf = 2;
    drop(buf);
    let mut buf = exchange.select().unwrap();
    *buf = 3;
    drop(buf);

    // Only one slot is left for writers while one is read and one is pending.
    let writing = exchange.select().unwrap();
    assert!(exchange.select().is_none());
    writing.cancel();

    assert_eq!(*reading, 1);
    drop(reading);
    assert_eq!(*exchange.acquire().unwrap(), 3);
}

#[test]
fn round_trip() {
    let exchange = Exchange::new(2, String::new);

    let mut buf = exchange.select().unwrap();
    buf.push_str("The quick brown fox jumps over the lazy dog");
    drop(buf);

    let buf = exchange.acquire().unwrap();
    assert_eq!(buf.as_str(), "The quick brown fox jumps over the lazy dog");
}

#[test]
fn reader_modifies_in_place() {
    let exchange = Exchange::new(1, Vec::<u8>::new);

    exchange.select().unwrap().extend_from_slice(b"abc");
    let mut buf = exchange.acquire().unwrap();
    buf.clear();
    drop(buf);

    let buf = exchange.select().unwrap();
    assert!(buf.is_empty());
    assert!(buf.capacity() >= 3);
}
