//! AquaChat terminal client.
//!
//! The binary is a set of view controllers over `aqua-runtime`: `login`,
//! `register` and `room` drive the socket channel through a [`Session`];
//! `rooms`, `create-room` and `download` talk to the REST side through
//! [`rest::ApiClient`]. The session token lives in durable storage
//! ([`token_store`]) between invocations.
//!
//! [`Session`]: aqua_runtime::Session

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod rest;
pub mod token_store;
