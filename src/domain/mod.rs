pub mod matcher;
pub mod resolver;
pub mod file_walker;

pub use matcher::{matches, SearchTerm};
pub use resolver::{resolve, ResolveError};
pub use file_walker::{walk, MatchResult, WalkStats};
