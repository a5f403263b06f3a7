//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_gateway;
pub mod rejecting_remote;

pub use fixtures::OriginRepo;
pub use mock_gateway::{CreatePrCall, MockGateway};
pub use rejecting_remote::RejectingRemote;
