//! Task tracking core.
//!
//! Tasks move through a fixed status lifecycle, persist through the
//! [`ports::TaskStore`] contract, and are browsed through filtered, sorted
//! projections. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Working set, projection, and session coordination in [`services`]
//!
//! Nothing here depends on a terminal; the front end talks to
//! [`services::Session`] through [`services::Intent`] values and read-only
//! projections.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
