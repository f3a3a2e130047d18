#[cfg(feature = "cli")]
pub mod cli;
pub mod engine;
pub mod error;
pub mod input;
pub mod model;
pub mod output;
pub mod registry;
pub mod tls;
pub mod util;
