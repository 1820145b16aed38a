pub mod prelude;

pub mod portfolios;
pub mod sessions;
pub mod users;
