/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and length policy
/// - [`jwt`]: Session token issuance and validation
/// - [`middleware`]: Caller identity from bearer header or `token` cookie
/// - [`authorization`]: Ownership resolution along card → list → board → workspace
///
/// # Example
///
/// ```no_run
/// use kanban_shared::auth::jwt::{create_token, validate_token, Claims};
/// use kanban_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let secret = "an-example-secret-that-is-32-bytes!!";
/// let token = create_token(&Claims::new(1, "ana@example.com", "Ana"), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.id, 1);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
