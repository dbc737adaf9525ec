//! Authentication and authorization.
//!
//! Passwords are stored as bcrypt hashes, requests authenticate with a
//! bearer JWT and every property scoped handler goes through
//! [`policy::authorize_property`].

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use middleware::{Identity, jwt_auth_middleware};
pub use policy::{authorize_property, require_owner};
