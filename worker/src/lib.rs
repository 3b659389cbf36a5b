pub mod builder;
pub mod client;
pub mod config;
pub mod error;

pub use builder::ClientBuilder;
pub use client::{Client, RoundReport, SyncReport};
pub use config::ClientConfig;
pub use error::{ClientErr, Result};
