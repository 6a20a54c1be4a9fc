//! Bounded Ring Buffer
//!
//! Provides a fixed-capacity FIFO buffer that evicts its oldest entry on
//! overflow. Used for per-sensor rolling history and the recent-failure log.

mod buffer;

pub use buffer::RingBuffer;
