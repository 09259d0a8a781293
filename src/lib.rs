pub mod api;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod ratelimit;
pub mod source;
