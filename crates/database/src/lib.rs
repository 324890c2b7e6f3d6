//! # bfx Database Crate
//!
//! This crate is the data access layer over the `bfx` PostgreSQL
//! schema. The business rules (netting, splitting, execution-type
//! selection) execute inside the stored functions; this crate's job is
//! to call them and to turn their results — including the composite
//! sub-records they nest inside single rows as delimited text — into
//! the domain object graph and back into bound call parameters.
//!
//! ## Architectural Principles
//!
//! - **Explicit pool:** the connection pool is built once at startup
//!   from `configuration` settings and passed by handle; there is no
//!   global state. Borrowing is bounded by the acquire timeout.
//! - **RAII cleanup:** a borrowed connection returns to the pool when
//!   it drops, on every exit path. No stage can leak it and cleanup
//!   can never mask the error that triggered it.
//! - **Typed errors:** every failure is a `DbError` variant carrying
//!   the originating cause chain, logged link by link before it is
//!   wrapped. Nothing is retried here.
//!
//! ## Public API
//!
//! - `connect`: builds the bounded connection pool.
//! - `OrderRepository`: the stored-function call catalogue.
//! - `composite::decode`: composite sub-record decoding.
//! - `DbError` / `MappingError`: the error taxonomy.

// Declare the modules that constitute this crate.
pub mod composite;
pub mod connection;
pub mod error;
mod mapper;
pub mod repository;
mod statement;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::{DbError, MappingError};
pub use repository::{OrderRepository, SplitOrderStageInsert};
