use crate::config::Config;
use crate::db::Store;

pub async fn cmd_remove_machine(config: &Config, client_id: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if !store.machine_exists(client_id).await? {
        println!("No virtual machine found with client ID {client_id}.");
        return Ok(());
    }

    println!("Remove virtual machine {client_id}?");
    println!("Enter 'y' to confirm, anything else to cancel:");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim().eq_ignore_ascii_case("y") {
        store.remove_machine_cascade(client_id).await?;
        println!("✓ Removed: {client_id}");
    } else {
        println!("Cancelled.");
    }

    Ok(())
}
