//! marina-server: berth reservations for a marina
//!
//! A reservation engine that refuses overlapping bookings on the same
//! catway, exposed through a JSON API (`/api`) and a server-rendered staff
//! web UI. Persistence is PostgreSQL or a process-local memory store.

pub mod accounts;
pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod reservations;
pub mod state;
pub mod web;

pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use reservations::{ReservationError, ReservationService};
pub use state::AppState;
