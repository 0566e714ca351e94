#![warn(rust_2018_idioms)]
#![allow(dead_code)]

// re-export sub-crates
pub use sdp;

pub mod api;
pub mod error;
pub mod media_devices;
pub mod media_session;
pub mod media_stream;
pub mod peer_connection;

pub use error::Error;

#[macro_use]
extern crate lazy_static;

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";

const RUNES_ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// math_rand_alpha generates a mathematical random alphabet sequence of the requested length.
pub(crate) fn math_rand_alpha(n: usize) -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    (0..n)
        .map(|_| {
            let idx = rng.random_range(0..RUNES_ALPHA.len());
            RUNES_ALPHA[idx] as char
        })
        .collect()
}
