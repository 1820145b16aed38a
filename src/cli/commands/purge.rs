use std::sync::Arc;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::db::Store;
use crate::services::SessionStore;

pub async fn cmd_purge_sessions(config: &Config) -> anyhow::Result<()> {
    let store = Store::connect(&config.database).await?;
    let sessions = SessionStore::new(store, Arc::new(SystemClock));

    let purged = sessions.purge_expired().await?;

    if purged == 0 {
        println!("No expired sessions.");
    } else {
        println!("✓ Purged {purged} expired session(s)");
    }

    Ok(())
}
