pub mod config;
pub mod oauth;
pub mod persistence;
pub mod security;
