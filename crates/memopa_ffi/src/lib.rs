//! Flutter-facing bindings for the Memopa core.

pub mod api;
