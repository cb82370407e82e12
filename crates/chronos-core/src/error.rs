//! Error type for the chronos core
//!
//! The per-cycle paths (ticks, drains, dispatch, button handling) never fail.
//! Errors only come from fixed capacities being exhausted during start-up
//! registration, from malformed edit requests, and from config storage.

use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    #[error("module ring is full ({capacity} entries)")]
    RingFull { capacity: usize },
    #[error("message bus is full ({capacity} subscribers)")]
    BusFull { capacity: usize },
    #[error("edit list has {len} items, at most {capacity} are supported")]
    TooManyEditItems { len: usize, capacity: usize },
    #[error("edit list has no item with a set handler")]
    NoEditableItems,
    #[error("failed to encode config")]
    ConfigEncode,
    #[error("failed to decode config")]
    ConfigDecode,
}
