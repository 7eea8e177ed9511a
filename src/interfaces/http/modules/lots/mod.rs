//! Per-lot pricing and stay quotes

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
