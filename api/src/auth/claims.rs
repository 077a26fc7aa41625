use serde::{Deserialize, Serialize};

/// Claims carried in a coordinator session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Id of the signed-in user; recorded as `created_by` on events,
    /// notes and report runs.
    pub sub: i64,
    pub exp: usize,
    /// Grants the admin-gated surfaces (PD template settings).
    pub admin: bool,
}

/// Verified claims attached to the request by the auth guards.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
