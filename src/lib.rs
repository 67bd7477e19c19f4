pub mod api;
pub mod cache;
pub mod config;
pub mod edge;
pub mod humanize;
pub mod observability;
pub mod origin;
