pub mod app;
pub mod config;
pub mod dashboard;
pub mod day;
pub mod db;
pub mod entries;
pub mod goals;
pub mod http;
pub mod nutrients;
pub mod oracle;
pub mod state;
pub mod store;
