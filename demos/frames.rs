use freshbuf::{init_tracing, Exchange};
use std::{thread, time::Duration};

const WIDTH: usize = 64;
const HEIGHT: usize = 48;
const FRAMES: u32 = 200;

struct Frame {
    number: u32,
    pixels: Vec<u8>,
}

fn main() {
    init_tracing();

    let exchange = Exchange::new(3, || Frame {
        number: 0,
        pixels: vec![0; WIDTH * HEIGHT],
    });

    let camera = thread::spawn({
        let exchange = exchange.clone();
        move || {
            let mut dropped = 0;
            for number in 1..=FRAMES {
                match exchange.select() {
                    Some(mut frame) => {
                        frame.number = number;
                        frame.pixels.fill(number as u8);
                    }
                    None => dropped += 1,
                }
                thread::sleep(Duration::from_millis(1));
            }
            dropped
        }
    });

    let display = thread::spawn({
        let exchange = exchange.clone();
        move || {
            let mut shown = 0;
            while let Some(frame) = exchange.acquire() {
                assert!(frame.pixels.iter().all(|&p| p == frame.number as u8));
                shown += 1;
                // Slow consumer, intermediate frames get dropped.
                thread::sleep(Duration::from_millis(5));
            }
            shown
        }
    });

    let dropped = camera.join().unwrap();
    exchange.stop();
    let shown = display.join().unwrap();

    let stats = exchange.stats();
    println!("captured: {}, no free slot: {}", stats.dispatched, dropped);
    println!("shown: {}, overwritten: {}", shown, stats.overwritten);
}
