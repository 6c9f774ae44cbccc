use std::str::FromStr;
use thiserror::Error;

/// The fixed command vocabulary of an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ListEverConnected,
    ListCurrentConnections,
    ListHardDisks,
    RemoveVirtualMachine,
    UpdateClientInfo,
    TotalStats,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl Command {
    /// Menu order.
    pub const ALL: [Self; 7] = [
        Self::ListEverConnected,
        Self::ListCurrentConnections,
        Self::ListHardDisks,
        Self::RemoveVirtualMachine,
        Self::UpdateClientInfo,
        Self::TotalStats,
        Self::Exit,
    ];

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::ListEverConnected => "list_of_users_ever_connected",
            Self::ListCurrentConnections => "list_of_current_connections",
            Self::ListHardDisks => "list_of_hard_disks",
            Self::RemoveVirtualMachine => "remove_virtual_machine",
            Self::UpdateClientInfo => "update_client_info",
            Self::TotalStats => "list_total_stats",
            Self::Exit => "exit",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ListEverConnected => "see the list of ever connected clients",
            Self::ListCurrentConnections => "see the list of currently connected clients",
            Self::ListHardDisks => "see the list of hard disks",
            Self::RemoveVirtualMachine => "remove a virtual machine",
            Self::UpdateClientInfo => "update client information",
            Self::TotalStats => "see the total statistics",
            Self::Exit => "exit",
        }
    }

    #[must_use]
    pub fn menu_line(self) -> String {
        format!("Type '{}' to {}", self.keyword(), self.description())
    }

    pub fn menu() -> impl Iterator<Item = String> {
        Self::ALL.into_iter().map(Self::menu_line)
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.keyword().eq_ignore_ascii_case(input))
            .ok_or_else(|| UnknownCommand(input.to_string()))
    }
}
