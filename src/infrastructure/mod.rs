//! Infrastructure layer: concrete adapters behind the domain ports.
//!
//! `static_provider` builds codes locally with no credentials, `efi` talks to
//! the Efí Pix API, and `qr` rasterizes payloads into PNG data URLs.

pub mod efi;
pub mod qr;
pub mod static_provider;
