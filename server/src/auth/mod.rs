//! Bearer-token authentication: JWT handling and request extractors.

pub mod extract;
pub mod jwt;

pub use extract::{AdminUser, AuthUser};
pub use jwt::{Claims, Jwt};
