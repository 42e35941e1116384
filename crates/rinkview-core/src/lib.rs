// Core domain for the rinkview dashboard: season stats parsing, metric
// projection, color mapping, configuration and HTTP retrieval.

pub mod catalog;
pub mod color;
pub mod config;
pub mod http;
pub mod projector;
pub mod season;
pub mod store;
