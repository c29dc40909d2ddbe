//! Panel logic: shared hardware state, command handling, and the periodic
//! sampling/flash tasks.

pub mod command;
pub mod dispatcher;
pub mod messages;
pub mod scheduler;
pub mod state;

pub use command::{Command, LedAction, RateDirection, RateKind};
pub use dispatcher::CommandDispatcher;
pub use scheduler::{run_flash_task, run_scan_task};
pub use state::{Panel, RateConfig, SharedPanel};
