pub mod engine;
pub mod render;
pub mod schema;

#[cfg(feature = "full")]
pub mod api;
#[cfg(feature = "full")]
pub mod cli;
#[cfg(feature = "full")]
pub mod config;
#[cfg(feature = "full")]
pub mod data;
#[cfg(feature = "full")]
pub mod forecast;
#[cfg(feature = "full")]
pub mod report;

#[cfg(feature = "wasm")]
pub mod wasm;
