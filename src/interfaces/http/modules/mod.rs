pub mod health;
pub mod lots;
pub mod metrics;
pub mod pricing;
pub mod request_id;
pub mod state;
pub mod templates;

pub use state::AppState;
