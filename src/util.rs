pub mod hex;

use std::sync::OnceLock;
use std::time::Instant;

pub fn now_millis() -> u128 {
    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    Instant::now().duration_since(*start).as_millis()
}

pub fn unix_time() -> u32 {
    chrono::Utc::now().timestamp() as u32
}
