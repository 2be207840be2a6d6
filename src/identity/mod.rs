pub mod directory;
#[cfg(feature = "redis")]
pub mod redis_directory;

pub use directory::{
    fallback_display_name, DirectoryError, DisplayNameSource, IdentityDirectory,
    InMemoryIdentityDirectory,
};
#[cfg(feature = "redis")]
pub use redis_directory::RedisIdentityDirectory;
