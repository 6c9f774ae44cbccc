//! Per-connection protocol state machine.
//!
//! A session authenticates a username, provisions a machine for first-time
//! users, then serves menu commands until the peer exits, removes its own
//! machine, or goes away.

pub mod channel;
pub mod command;
pub mod error;
pub mod prompt;
pub mod render;

pub use channel::LineChannel;
pub use command::{Command, UnknownCommand};
pub use error::{ProtocolViolation, SessionError};

use crate::domain::{ClientId, IdentityOrigin};
use crate::services::{Registry, RegistryError};
use prompt::FieldPrompt;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_LINE_BYTES: usize = 4096;

const NOT_FOUND_MESSAGE: &str = "Error: No virtual machine found with the provided client_id";

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    AwaitingUsername,
    AwaitingProvisionFields(ClientId),
    Authenticated(ClientId),
    Terminated,
}

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Exit,
    SelfRemoved,
    ProvisioningFailed,
}

pub struct Session<R, W> {
    channel: LineChannel<R, W>,
    registry: Arc<dyn Registry>,
    /// Client currently marked live by this session.
    live: Option<ClientId>,
    /// Identity created by this session whose machine is not yet saved.
    pending: Option<ClientId>,
    end: Option<SessionEnd>,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, registry: Arc<dyn Registry>, max_line_bytes: usize) -> Self {
        Self {
            channel: LineChannel::new(reader, writer, max_line_bytes),
            registry,
            live: None,
            pending: None,
            end: None,
        }
    }

    /// Drives the session to completion.
    ///
    /// Whatever the outcome, a client this session marked live is marked
    /// disconnected again before returning, and an identity it created but
    /// never provisioned is dropped.
    pub async fn run(mut self) -> Result<SessionEnd, SessionError> {
        let mut state = State::AwaitingUsername;

        let result = loop {
            let step = match state {
                State::AwaitingUsername => self.await_username().await,
                State::AwaitingProvisionFields(client_id) => self.provision(client_id).await,
                State::Authenticated(client_id) => self.serve_command(client_id).await,
                State::Terminated => break Ok(self.end.unwrap_or(SessionEnd::Exit)),
            };

            match step {
                Ok(next) => state = next,
                Err(e) => break Err(e),
            }
        };

        if let Some(client_id) = self.live.take() {
            if let Err(e) = self.registry.mark_disconnected(&client_id).await {
                warn!(client_id = %client_id, error = %e, "Failed to clear live connection");
            }
        }

        if let Some(client_id) = self.pending.take() {
            if let Err(e) = self.registry.abandon_identity(&client_id).await {
                warn!(client_id = %client_id, error = %e, "Failed to drop unprovisioned identity");
            }
        }

        self.channel.close().await;
        result
    }

    async fn await_username(&mut self) -> Result<State, SessionError> {
        let [username] = self.collect_fields([prompt::USERNAME]).await?;

        match self.registry.resolve_or_create_identity(&username).await {
            Ok((client_id, IdentityOrigin::Returning)) => {
                self.channel
                    .send_line("User found. Connecting to virtual machine...")
                    .await?;
                self.authenticate(client_id).await
            }
            Ok((client_id, IdentityOrigin::Created)) => {
                self.pending = Some(client_id.clone());
                self.channel
                    .send_line("User not found. Creating virtual machine...")
                    .await?;
                Ok(State::AwaitingProvisionFields(client_id))
            }
            Err(RegistryError::Conflict(_)) => {
                self.channel
                    .send_line(&format!(
                        "Error: Username '{username}' was registered concurrently, please try again"
                    ))
                    .await?;
                Ok(State::AwaitingUsername)
            }
            Err(RegistryError::Validation(msg)) => {
                self.channel.send_line(&format!("Error: {msg}")).await?;
                Ok(State::AwaitingUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn provision(&mut self, client_id: ClientId) -> Result<State, SessionError> {
        let answers = self.collect_fields(prompt::PROVISION_FIELDS).await?;
        let spec = prompt::machine_spec(answers);

        match self.registry.provision_machine(&client_id, &spec).await {
            Ok(()) => {
                self.pending = None;
                self.channel.send_line("Client information saved").await?;
                self.authenticate(client_id).await
            }
            Err(RegistryError::Conflict(msg)) => {
                warn!(client_id = %client_id, conflict = %msg, "Machine already provisioned");
                self.channel
                    .send_line("Error: Could not save client information")
                    .await?;
                self.end = Some(SessionEnd::ProvisioningFailed);
                Ok(State::Terminated)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticate(&mut self, client_id: ClientId) -> Result<State, SessionError> {
        self.channel.send_line("Authentication successful").await?;
        self.channel
            .send_line(&format!("Your client ID: {client_id}"))
            .await?;

        self.registry.mark_connected(&client_id).await?;
        self.live = Some(client_id.clone());

        tracing::Span::current().record("client_id", tracing::field::display(&client_id));
        info!(client_id = %client_id, "Client authenticated");

        Ok(State::Authenticated(client_id))
    }

    async fn serve_command(&mut self, client_id: ClientId) -> Result<State, SessionError> {
        self.channel.send_lines(Command::menu()).await?;
        let line = self.channel.read_line().await?;

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(UnknownCommand(input)) => {
                debug!(input, "Unknown command");
                metrics::counter!("vmhost_commands_total", "command" => "unknown").increment(1);
                self.channel.send_line("Error: Unknown command").await?;
                return Ok(State::Authenticated(client_id));
            }
        };

        metrics::counter!("vmhost_commands_total", "command" => command.keyword()).increment(1);
        debug!(command = command.keyword(), "Dispatching command");

        let keep_going = match command {
            Command::ListEverConnected => self.list_ever_connected().await?,
            Command::ListCurrentConnections => self.list_current_connections().await?,
            Command::ListHardDisks => self.list_hard_disks().await?,
            Command::RemoveVirtualMachine => self.remove_virtual_machine(&client_id).await?,
            Command::UpdateClientInfo => self.update_client_info().await?,
            Command::TotalStats => self.total_stats().await?,
            Command::Exit => self.exit(&client_id).await?,
        };

        Ok(if keep_going {
            State::Authenticated(client_id)
        } else {
            State::Terminated
        })
    }

    // ========================================================================
    // Command handlers. Each returns whether the session stays open.
    // ========================================================================

    async fn list_ever_connected(&mut self) -> Result<bool, SessionError> {
        let rows = self.registry.ever_connected().await?;
        let lines = render::listing(
            "List of ever connected clients:",
            rows.iter().map(render::client_line),
        );
        self.channel.send_lines(lines).await?;
        Ok(true)
    }

    async fn list_current_connections(&mut self) -> Result<bool, SessionError> {
        let rows = self.registry.currently_connected().await?;
        let lines = render::listing(
            "List of currently connected clients:",
            rows.iter().map(render::client_line),
        );
        self.channel.send_lines(lines).await?;
        Ok(true)
    }

    async fn list_hard_disks(&mut self) -> Result<bool, SessionError> {
        let rows = self.registry.hard_disks().await?;
        let lines = render::listing(
            "List of hard disks:",
            rows.iter().map(render::hard_disk_line),
        );
        self.channel.send_lines(lines).await?;
        Ok(true)
    }

    async fn remove_virtual_machine(&mut self, own: &ClientId) -> Result<bool, SessionError> {
        let [target] = self.collect_fields([prompt::REMOVE_TARGET]).await?;
        let target = ClientId::from(target);

        if &target == own {
            self.channel
                .send_line("Removing your own virtual machine. Disconnecting...")
                .await?;
            self.registry.mark_disconnected(own).await?;
            self.live = None;
            self.registry.remove_virtual_machine(own).await?;
            self.end = Some(SessionEnd::SelfRemoved);
            return Ok(false);
        }

        if self.registry.machine_exists(&target).await? {
            self.registry.remove_virtual_machine(&target).await?;
            self.channel.send_line("Virtual machine removed").await?;
        } else {
            self.channel.send_line(NOT_FOUND_MESSAGE).await?;
        }
        Ok(true)
    }

    async fn update_client_info(&mut self) -> Result<bool, SessionError> {
        let answers = self.collect_fields(prompt::UPDATE_FIELDS).await?;
        let (target, spec) = prompt::update_request(answers);

        match self.registry.update_machine(&target, &spec).await {
            Ok(()) => self.channel.send_line("Client information updated").await?,
            Err(RegistryError::NotFound(_)) => self.channel.send_line(NOT_FOUND_MESSAGE).await?,
            Err(e) => return Err(e.into()),
        }
        Ok(true)
    }

    async fn total_stats(&mut self) -> Result<bool, SessionError> {
        let stats = self.registry.stats().await?;
        self.channel.send_line(&render::stats_line(&stats)).await?;
        Ok(true)
    }

    async fn exit(&mut self, own: &ClientId) -> Result<bool, SessionError> {
        self.registry.mark_disconnected(own).await?;
        self.live = None;
        self.channel.send_line("Disconnecting...").await?;
        self.end = Some(SessionEnd::Exit);
        Ok(false)
    }

    /// Prompts for each field in order, re-asking until its validator passes.
    async fn collect_fields<const N: usize>(
        &mut self,
        fields: [FieldPrompt; N],
    ) -> Result<[String; N], SessionError> {
        let mut answers: [String; N] = std::array::from_fn(|_| String::new());

        for (field, answer) in fields.iter().zip(answers.iter_mut()) {
            loop {
                let value = self.channel.prompt(field.prompt).await?;
                match (field.validate)(&value) {
                    Ok(()) => {
                        *answer = value;
                        break;
                    }
                    Err(reason) => {
                        self.channel
                            .send_line(&format!("Error: {} {reason}", field.name))
                            .await?;
                    }
                }
            }
        }

        Ok(answers)
    }
}
