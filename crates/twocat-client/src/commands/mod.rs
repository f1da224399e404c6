//! Intent handlers.
//!
//! Each sub-module adds an `impl Client` block for one area. Handlers take the
//! state lock only for synchronous work and publish their view events after
//! releasing it.

pub mod boards;
pub mod call;
pub mod links;
pub mod media;
pub mod posts;
