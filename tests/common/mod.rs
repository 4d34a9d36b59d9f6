use std::sync::{Arc, Mutex, Once};

use clockpro::ClockProCache;
use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs a test logger once per test binary. `RUST_LOG` overrides the
/// default level.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("clockpro", LevelFilter::Info)
            .format_timestamp_millis()
            .is_test(true)
            .parse_default_env();

        let _ = builder.try_init();
    });
}

/// Values handed to a cache's write callback, in eviction order.
pub type WriteLog<K, V> = Arc<Mutex<Vec<(K, V)>>>;

/// Cache whose read callback returns `key * 10` and whose write callback
/// records every evicted value.
#[allow(dead_code)]
pub fn recording_cache(capacity: usize) -> (ClockProCache<u32, u32>, WriteLog<u32, u32>) {
    let written: WriteLog<u32, u32> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&written);
    let cache = ClockProCache::builder(capacity)
        .read_fn(|key: &u32| Ok(key * 10))
        .write_fn(move |key: &u32, value: u32| sink.lock().unwrap().push((*key, value)))
        .build();
    (cache, written)
}
