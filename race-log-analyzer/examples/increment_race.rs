//! Racy counter-increment demo
//!
//! Spawns worker threads that each read the shared counter, add one and store
//! it back as two separate steps, printing `[<id>] glob = <value>` after every
//! store. Without a lock, stores from different threads overwrite each other
//! and the final value falls short of `threads * loops`.
//!
//! Usage:
//!   cargo run --example increment_race -- [loops] [threads] > thread_incr.log
//!
//! Example:
//!   cargo run --example increment_race -- 100000 2 > thread_incr.log

use std::env;
use std::io::{self, BufWriter, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

fn main() {
    let args: Vec<String> = env::args().collect();
    let loops: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10_000);
    let threads: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(2);

    let glob = Arc::new(AtomicU64::new(0));
    // Only serializes printing; the increments themselves race
    let out = Arc::new(Mutex::new(BufWriter::new(io::stdout())));

    let handles: Vec<_> = (1..=threads)
        .map(|id| {
            let glob = Arc::clone(&glob);
            let out = Arc::clone(&out);
            thread::spawn(move || {
                for _ in 0..loops {
                    let mut loc = glob.load(Ordering::Relaxed);
                    loc += 1;
                    glob.store(loc, Ordering::Relaxed);

                    let mut out = out.lock().unwrap();
                    writeln!(out, "[{}] glob = {}", id, glob.load(Ordering::Relaxed)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut out = out.lock().unwrap();
    writeln!(out, "glob = {}", glob.load(Ordering::Relaxed)).unwrap();
    out.flush().unwrap();
}
