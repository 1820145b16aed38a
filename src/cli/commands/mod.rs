mod delete_user;
mod migrate;
mod purge;

pub use delete_user::cmd_delete_user;
pub use migrate::cmd_migrate;
pub use purge::cmd_purge_sessions;
