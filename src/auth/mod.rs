pub mod password;

pub use password::{PasswordConfig, PasswordHasher};
