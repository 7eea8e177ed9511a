pub mod errors;
pub mod money;
pub mod shutdown;

pub use errors::*;
pub use money::{format_yuan, round_money};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
