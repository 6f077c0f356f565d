//! Integration tests for the Tarantino generation pipeline

mod cli_route;
mod config_integration;
mod extraction;
mod generation_client;
mod http_transport;
mod lifecycle;
mod phase_store;
mod test_utils;
