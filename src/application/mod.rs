pub mod config;
pub mod scheduler;
pub mod search;

pub use config::{Config, ConfigError, SearchConfig};
pub use scheduler::{SchedulerStats, TaskScheduler};
pub use search::{SearchEngine, SearchStats};
