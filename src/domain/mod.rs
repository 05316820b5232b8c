//! Domain layer: the BR Code codec and the value objects it operates on.
//!
//! Everything here is pure and synchronous; payload construction never
//! touches the network. The ports module defines the trait boundaries the
//! infrastructure adapters implement.

pub mod charge;
pub mod crc;
pub mod key;
pub mod normalize;
pub mod payload;
pub mod ports;
