pub mod app_state;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod generator;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod telemetry;
pub mod titles;
pub mod truncate;
