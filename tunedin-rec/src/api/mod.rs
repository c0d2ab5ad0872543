//! HTTP API handlers for tunedin-rec

pub mod health;
pub mod history;
pub mod recommend;

pub use health::health_routes;
pub use history::history_routes;
pub use recommend::recommend_routes;
