//! # rental-admin
//!
//! Routing policy and API access for the vehicle-rental admin client.
//!
//! The crate has three independent pieces: the route table with its
//! navigation guard (`router`), the REST facade with observable request
//! flags (`net`, `state::request`), and peso formatting (`util::currency`).
//! Session flags (`state::session`) feed the guard; views and the backend
//! live elsewhere.

pub mod config;
pub mod net;
pub mod router;
pub mod state;
pub mod util;

pub use config::{ApiConfig, ConfigError};
pub use net::api::{ApiClient, ApiError};
pub use router::{NavAction, NavError, Navigation, Navigator, Role};
pub use state::request::{RequestState, RequestStatus};
pub use state::session::{MalformedSessionPolicy, SessionFlags, SessionStore};
pub use util::currency::{currency_symbol, format_peso, format_with_symbol};
