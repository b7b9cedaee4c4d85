/// Authentication and authorization utilities
///
/// This module provides the authentication primitives for Tasklist:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and password rules
/// - [`jwt`]: Signed session tokens carried in the session cookie
/// - [`session`]: Session cookie parsing and `Set-Cookie` construction
/// - [`middleware`]: Resolving a session token into an [`middleware::AuthContext`]
/// - [`authorization`]: The task ownership guard
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::auth::password::{hash_password, verify_password};
/// use tasklist_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), 0, Duration::hours(24));
/// let token = create_token(&claims, "secret-key")?;
/// let validated = validate_token(&token, "secret-key")?;
/// assert_eq!(validated.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;
