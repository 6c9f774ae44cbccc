//! Offline listing commands

use crate::config::Config;
use crate::db::Store;
use crate::session::render;

pub async fn cmd_list_clients(config: &Config, current: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let rows = if current {
        store.list_currently_connected().await?
    } else {
        store.list_all_ever_connected().await?
    };

    if rows.is_empty() {
        if current {
            println!("No clients currently connected.");
        } else {
            println!("No clients registered.");
        }
        return Ok(());
    }

    let label = if current { "Connected" } else { "Registered" };
    println!("{} clients ({} total)", label, rows.len());
    println!("{:-<70}", "");

    for row in &rows {
        println!("{}", render::client_line(row));
    }

    Ok(())
}

pub async fn cmd_list_disks(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let rows = store.list_hard_disks().await?;

    if rows.is_empty() {
        println!("No hard disks registered.");
        return Ok(());
    }

    for row in &rows {
        println!("{}", render::hard_disk_line(row));
    }

    Ok(())
}
