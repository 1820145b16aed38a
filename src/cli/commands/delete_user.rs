use crate::config::Config;
use crate::db::Store;

pub async fn cmd_delete_user(config: &Config, username: &str, yes: bool) -> anyhow::Result<()> {
    let store = Store::connect(&config.database).await?;

    let Some(user) = store.users().get_by_username(username).await? else {
        println!("User '{username}' not found.");
        return Ok(());
    };

    let portfolio_count = store.portfolios().list_by_owner(user.id).await?.len();
    let session_count = store.sessions().count_for_user(user.id).await?;

    if !yes {
        println!(
            "Delete '{}' (ID: {}) along with {} portfolio(s) and {} session(s)?",
            user.username, user.id, portfolio_count, session_count
        );
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if store.users().delete(user.id).await? {
        println!("✓ Deleted: {}", user.username);
    } else {
        println!("Failed to delete user.");
    }

    Ok(())
}
