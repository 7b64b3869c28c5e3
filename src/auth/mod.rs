pub mod authenticator;
pub mod credentials;
pub mod password;
pub mod token;

pub use authenticator::resolve;
pub use credentials::{extract, Credentials};
pub use token::{generate_jwt, validate_jwt, Claims, JwtError};
