//! Wire types for the AquaChat protocol.
//!
//! This crate contains the serde-serializable types exchanged with the
//! AquaChat server, in both of its guises: named events over the
//! bidirectional socket channel, and DTOs for the REST endpoints
//! (room listing, message history, room creation, uploads).
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **1:1 with the wire**: Field names match what the server emits
//! - **Closed sets**: Each direction of the socket channel is a tagged
//!   union ([`ClientEvent`], [`ServerEvent`]) rather than free-form JSON
//!
//! Connection lifecycle and dispatch live in `aqua-runtime`.

pub mod events;
pub mod rest;

pub use events::*;
pub use rest::*;
