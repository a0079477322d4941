pub mod api_football;
pub mod config;
pub mod extract;
pub mod http_cache;
pub mod http_client;
pub mod scores;
pub mod state;
pub mod tables;
