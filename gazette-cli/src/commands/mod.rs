pub mod play;
pub mod pool;
pub mod status;

pub use play::{handle_play_command, PlayArgs};
pub use pool::{handle_pool_command, PoolCommands};
pub use status::handle_status_command;
