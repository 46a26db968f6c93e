//! The user directory store - the single source of truth for the user
//! collection. The presentation layer never touches the cache directly;
//! all reads and mutations go through `UserDirectory`.

mod directory;

pub use directory::UserDirectory;
