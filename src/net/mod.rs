//! Networking: the REST facade over the rental backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns the HTTP client, URL joining, and error normalization. Request
//! flags live in `crate::state::request`.

pub mod api;
