//! CLI module - Command-line interface for vmhost
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vmhost - Virtual machine registry over a line-based TCP protocol
#[derive(Parser)]
#[command(name = "vmhost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to the usual search locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the TCP server (default)
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8888
        #[arg(long)]
        bind: Option<String>,
        /// Database URL, e.g. sqlite:data/vmhost.db
        #[arg(long)]
        database: Option<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List clients that have ever connected
    #[command(alias = "ls")]
    Clients {
        /// Only show clients with an open session
        #[arg(long)]
        current: bool,
    },

    /// List hard disks per user
    Disks,

    /// Show total machine statistics
    Stats,

    /// Remove a virtual machine and its identity
    #[command(alias = "rm")]
    Remove {
        /// Client ID of the machine
        client_id: String,
    },
}

pub use commands::*;
