pub mod config;
pub mod console;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod report;
pub mod transport;
