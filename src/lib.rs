// Public API for integration tests and potential library usage

pub mod api;
pub mod matcher;
pub mod normalize;
pub mod protocol;
pub mod roster;
pub mod server;
pub mod state;
pub mod types;
pub mod ws;
