pub mod db;
pub mod password;

pub use db::DbStore;
pub use password::Argon2Hasher;
