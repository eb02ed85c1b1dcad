pub mod claims;
pub mod context;
pub mod jwks;
pub mod middleware;
pub mod session;

pub use claims::Claims;
pub use context::AuthContext;
pub use jwks::JwksCache;
pub use middleware::RequireAuth;
pub use session::{CurrentUser, Session};
