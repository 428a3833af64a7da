//! HTTP inbound adapter exposing the legacy account endpoints.

pub mod people;
pub mod state;

pub use state::HttpState;
