pub mod portfolio;
pub mod session;
pub mod user;

pub use portfolio::Portfolio;
pub use session::{IssuedSession, Session};
pub use user::User;
