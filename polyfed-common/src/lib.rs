//! Shared layer of the polyfed crates.
//!
//! Everything in this crate is pure: backend identification from version
//! strings, the capability matrix derived from an instance snapshot, the
//! lenient normalization engine, and the canonical entity types that every
//! dialect's wire payloads are reconciled into. Network I/O lives in the
//! `polyfed` crate.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod entities;
pub mod features;
pub mod lenient;
pub mod streaming;
pub mod version;

pub use entities::Entity;
pub use features::Features;
pub use version::BackendIdentity;
