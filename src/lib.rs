pub mod app;
pub mod config;
pub mod format;
pub mod store;
pub mod tmdb;
pub mod view;
