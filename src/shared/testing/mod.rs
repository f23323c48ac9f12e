mod fake_runner;
mod git_repo;

pub use fake_runner::{FakeRunner, fail, ok};
pub use git_repo::TestRepo;
