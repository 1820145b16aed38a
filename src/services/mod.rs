pub mod credentials;
pub use credentials::{CredentialError, CredentialHasher};

pub mod session_store;
pub use session_store::{SessionError, SessionStore};

pub mod session_purge;
pub use session_purge::SessionPurger;

pub mod identity;
pub use identity::IdentityResolver;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, AuthSession, AuthStatus, LogoutOutcome};
pub use auth_service_impl::SeaOrmAuthService;

pub mod portfolio_service;
pub mod portfolio_service_impl;
pub use portfolio_service::{PortfolioError, PortfolioService};
pub use portfolio_service_impl::SeaOrmPortfolioService;
