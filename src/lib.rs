// 分层结构：领域逻辑、应用编排、基础设施、输出展示
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{MatchResult, SearchTerm, WalkStats};
pub use application::{Config, ConfigError, SearchConfig, SearchEngine, SearchStats, TaskScheduler};
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::{ReportSender, Reporter, SearchSummary};
