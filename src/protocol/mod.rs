//! ACME wire protocol: directory document and JWS construction.
pub mod directory;
pub mod jws;

pub use directory::{Directory, DirectoryMeta};
pub use jws::{FlattenedJws, sign};
