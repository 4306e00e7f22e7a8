//! Off-grid solar + battery microgrid sizing.
//!
//! The sizing core (`services::{thermal, battery, solar_array, load_profile,
//! design_service}`) is pure and synchronous: it takes already-fetched
//! irradiance and never performs I/O. `services::clear_sky` and
//! `services::nasa_power` provide that data; `controllers` and `routes`
//! expose everything over HTTP.

pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;
