pub mod config;
pub mod errors;
pub mod queue;
pub mod registry;
pub mod server;
pub mod sync;
pub mod webhook;
pub mod worker;
