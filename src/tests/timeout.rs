use crate::{Exchange, WaitError};
use std::{
    thread,
    time::{Duration, Instant},
};

const TIMEOUT: Option<Duration> = Some(Duration::from_millis(100));

#[test]
#[cfg_attr(miri, ignore)]
fn timed_out() {
    let exchange = Exchange::from_values([0, 0]);
    let start = Instant::now();
    assert_eq!(exchange.acquire_timeout(TIMEOUT).unwrap_err(), WaitError::TimedOut);
    let elapsed = start.elapsed();
    assert!(elapsed >= TIMEOUT.unwrap());
    assert!(elapsed < TIMEOUT.unwrap() + Duration::from_secs(5));
}

#[test]
fn zero_timeout() {
    let exchange = Exchange::from_values([0, 0]);
    assert_eq!(
        exchange.acquire_timeout(Some(Duration::ZERO)).unwrap_err(),
        WaitError::TimedOut
    );

    exchange.select().unwrap().dispatch();
    assert!(exchange.acquire_timeout(Some(Duration::ZERO)).is_ok());
}

#[test]
fn stopped() {
    let exchange = Exchange::from_values([0, 0]);
    exchange.select().unwrap().dispatch();
    exchange.stop();
    assert_eq!(exchange.acquire_timeout(TIMEOUT).unwrap_err(), WaitError::Stopped);
    assert_eq!(exchange.acquire_timeout(None).unwrap_err(), WaitError::Stopped);
}

#[test]
#[cfg_attr(miri, ignore)]
fn dispatched_within_timeout() {
    let exchange = Exchange::from_values([0, 0]);

    let writer = thread::spawn({
        let exchange = exchange.clone();
        move || {
            thread::sleep(Duration::from_millis(10));
            let mut buf = exchange.select().unwrap();
            *buf = 5;
        }
    });

    let buf = exchange.acquire_timeout(Some(Duration::from_secs(10))).unwrap();
    assert_eq!(*buf, 5);
    writer.join().unwrap();
}

#[test]
#[cfg_attr(miri, ignore)]
fn stopped_while_waiting() {
    let exchange = Exchange::from_values([0, 0]);

    let reader = thread::spawn({
        let exchange = exchange.clone();
        move || exchange.acquire_timeout(Some(Duration::from_secs(10))).map(|buf| *buf)
    });

    thread::sleep(Duration::from_millis(10));
    exchange.stop();
    assert_eq!(reader.join().unwrap(), Err(WaitError::Stopped));
}

#[test]
#[cfg_attr(miri, ignore)]
fn readers_woken_one_by_one() {
    let exchange = Exchange::from_values([0, 0, 0]);

    let readers = (0..2)
        .map(|_| {
            let exchange = exchange.clone();
            thread::spawn(move || exchange.acquire_timeout(Some(Duration::from_secs(10))).map(|buf| *buf))
        })
        .collect::<Vec<_>>();

    thread::sleep(Duration::from_millis(50));
    for value in 1..=2 {
        let mut buf = exchange.select().unwrap();
        *buf = value;
        drop(buf);
        while exchange.stats().acquired < value {
            thread::sleep(Duration::from_millis(1));
        }
    }

    let mut values = readers
        .into_iter()
        .map(|reader| reader.join().unwrap().unwrap())
        .collect::<Vec<_>>();
    values.sort();
    assert_eq!(values, [1, 2]);
}

#[test]
fn display() {
    assert_eq!(WaitError::TimedOut.to_string(), "timed out waiting for a pending buffer");
    assert_eq!(WaitError::Stopped.to_string(), "exchange is stopped");
}
