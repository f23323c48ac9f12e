//! Git operations through the `git` CLI.
//!
//! Every call goes through a [`CommandRunner`](crate::shared::command::CommandRunner),
//! so the workflows built on top can be tested against scripted output.

mod branch;
mod error;
mod location;
mod remote;
mod repo;
mod status;

pub use branch::UpstreamRef;
pub use error::GitError;
pub use location::{ParsedRemoteLocation, Provider};
pub use repo::Git;
