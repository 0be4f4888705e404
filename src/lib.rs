//! Craiova city guide: places, events, reviews and personalized suggestions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
