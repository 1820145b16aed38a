pub use super::portfolios::Entity as Portfolios;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
