//! Utility helpers shared across display and CLI code.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure, stateless leaves with no dependency on the router or HTTP layers.

pub mod currency;
