//! Authentication, session ownership and route guarding

pub mod authenticator;
pub mod cookie;
pub mod guard;
pub mod jwt;
pub mod models;
pub mod refresh;
pub mod session;

pub use authenticator::{landing_path, session_from_tokens, Authenticator};
pub use guard::{authorize, route_guard, GuardDecision};
pub use jwt::{decode_claims, Claims};
pub use models::{Credentials, CurrentUser, Role, Session, SessionError, TokenPair};
pub use refresh::TokenRefresher;
pub use session::SessionManager;
