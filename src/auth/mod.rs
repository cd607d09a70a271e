/// Authentication module
///
/// Password hashing, `Authorization` header parsing, JWT access tokens
/// and database-backed refresh tokens.

mod claims;
mod extractor;
mod headers;
mod jwt;
mod password;
mod refresh_token;

pub use claims::{Claims, ISSUER};
pub use extractor::AuthenticatedUser;
pub use headers::{get_api_key, get_bearer_token};
pub use jwt::{generate_access_token, validate_access_token};
pub use password::{hash_password, verify_password};
pub use refresh_token::{
    generate_refresh_token, lookup_refresh_token, revoke_refresh_token, save_refresh_token,
    user_for_refresh_token,
};
