pub mod config;
pub mod recommendation;
pub mod scrape;
pub mod utils;
pub mod web;

pub use web::start_web_server;
