//! Storage primitives shared by the template tooling.
//!
//! Templates and assets are addressed by UTF-8 paths inside a
//! [`FileSystem`], which behaves like a key-value path store with directory
//! semantics. [`InMemoryFileSystem`] backs tests, [`OsFileSystem`] the real
//! disk, and [`ScopedFileSystem`] confines relative paths to a root.

mod path;
mod system;

pub use path::clean_utf8_path;
pub use path::safe_join;
pub use path::SafeJoinError;
pub use system::FileSystem;
pub use system::InMemoryFileSystem;
pub use system::OsFileSystem;
pub use system::ScopedFileSystem;
