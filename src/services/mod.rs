// src/services/mod.rs
pub mod chat_client;
pub mod input_handler;
pub mod transcript;
