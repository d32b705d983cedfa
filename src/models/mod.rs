pub mod config;
pub mod installation;
pub mod types;
