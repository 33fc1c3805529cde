//! GeoBridge Core Library
//!
//! Core functionality for GeoBridge - host-embedded positioning
//! sessions. This crate turns a native positioning SDK into a small,
//! consent-gated command-and-event surface a host runtime can embed.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod consent;
pub mod event;
pub mod position;
pub mod provider;
pub mod session;

pub use api::GeoBridge;
