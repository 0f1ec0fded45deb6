//! Audio codec implementations.
//!
//! - `opus`: Opus audio codec (RFC 6716)
//! - `ogg`: Ogg container format (RFC 3533)
//! - `oggopus`: Opus in Ogg encapsulation (RFC 7845)

pub mod opus;
pub mod ogg;
pub mod oggopus;
