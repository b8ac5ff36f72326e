//! # Telestage Transport
//!
//! Concrete [`Bot`](telestage_core::Bot) implementations.
//!
//! ## Feature Flags
//!
//! - `http-client` - [`HttpBot`], a Bot API client over HTTPS (reqwest)
//!
//! Without any feature this crate is empty; hosts that bring their own
//! transport only need `telestage-core`.

#[cfg(feature = "http-client")]
pub mod http;

#[cfg(feature = "http-client")]
pub use http::{DEFAULT_API_URL, HttpBot};
