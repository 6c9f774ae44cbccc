mod clients;
mod remove;
mod stats;

pub use clients::{cmd_list_clients, cmd_list_disks};
pub use remove::cmd_remove_machine;
pub use stats::cmd_stats;
