//! HTTP bridge from filter query strings to the DSD database's stored
//! procedures and views.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
