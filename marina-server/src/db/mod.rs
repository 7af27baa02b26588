//! Database layer - storage traits, connection pool and repositories
//!
//! # Design Principles
//!
//! - Stores are explicit handles injected into `AppState`, never globals
//! - Connection pool (max 5 connections) - no Arc<Mutex<Connection>>
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pool::create_pool;
pub use repos::{BerthRepo, ReservationRepo, UserRepo};
pub use store::{BerthDirectory, BerthStore, ReservationStore, StoreError, UserStore};
