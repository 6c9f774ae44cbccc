use crate::config::Config;
use crate::db::Store;
use crate::session::render;

pub async fn cmd_stats(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let stats = store.total_stats().await?;

    println!("{}", render::stats_line(&stats));

    Ok(())
}
