pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod services;
pub mod surface;
pub mod terminal;
