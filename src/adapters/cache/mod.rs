//! In-process caching: the bounded result cache and content fingerprinting.

mod bounded;
mod fingerprint;

pub use bounded::BoundedCache;
pub use fingerprint::fingerprint;
