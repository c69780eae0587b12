//! Client state read or written around navigation and API calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` derives auth flags from the persisted key-value store;
//! `request` holds the observable loading/error/connected flags the API
//! facade updates.

pub mod request;
pub mod session;
