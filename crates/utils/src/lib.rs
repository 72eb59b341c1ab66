extern crate rand;

use rand::Rng;
use std::time::Duration;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";

pub fn create_random_secret(secret_len: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..secret_len)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Length of a `Duration` in millis, saturating at `i64::MAX`
pub fn duration_millis(duration: Duration) -> i64 {
    if duration.as_millis() > i64::MAX as u128 {
        i64::MAX
    } else {
        duration.as_millis() as i64
    }
}
