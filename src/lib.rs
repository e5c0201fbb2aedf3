pub mod cli;
pub mod config;
pub mod data;
pub mod deck;
pub mod server;
pub mod session;
