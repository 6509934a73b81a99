//! Flutter bridge surface for Solace core.

pub mod api;
