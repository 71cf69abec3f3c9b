//! Core library for `textbin`.
//!
//! Contains the in-memory document store, the save/append mutation protocol
//! that keeps it in step with the backing file, and the shared-secret gate
//! that guards mutations. This crate depends on `textbin-storage` for the
//! backing file trait and knows nothing about HTTP.

pub mod auth;
pub mod document;
pub mod error;
pub mod mutation;
pub mod store;
