//! Actix middleware wrapped around every route.

pub mod trace;

pub use trace::Trace;
