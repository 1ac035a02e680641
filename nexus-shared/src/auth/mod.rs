/// Authentication and access-control utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: JWT token generation and validation
/// - [`policy`]: Fixed role/operation decision table
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with access/refresh expiration
/// - **Constant-time Comparison**: Password verification is constant-time

pub mod jwt;
pub mod password;
pub mod policy;
