//! `souk-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it defines
//! roles, bearer-token claims, the HS256 codec, password hashing, and the
//! user entity, and leaves transport/persistence to the api/store crates.

pub mod claims;
pub mod password;
pub mod roles;
pub mod token;
pub mod user;

pub use claims::{Claims, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use roles::Role;
pub use token::{Hs256TokenCodec, TokenError, TokenVerifier};
pub use user::{NewUser, User};
