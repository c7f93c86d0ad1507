pub mod aggregator;
pub mod database;
pub mod password;
pub mod user_service;
pub mod youtube_client;
