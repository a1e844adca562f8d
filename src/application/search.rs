use std::sync::{Arc, Mutex};

use crate::application::config::SearchConfig;
use crate::application::scheduler::{SchedulerStats, TaskScheduler};
use crate::domain::{file_walker, SearchTerm, WalkStats};
use crate::infrastructure::{ErrorLogger, LoggerTrait};
use crate::presentation::ReportSender;

/// 一次搜索的汇总统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub walk: WalkStats,
    pub tasks: SchedulerStats,
}

/// 搜索引擎：为每个搜索词启动一个遍历任务，结果统一交给输出器
pub struct SearchEngine {
    config: SearchConfig,
    logger: Arc<dyn LoggerTrait>,
    errors: Arc<ErrorLogger>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig, logger: Arc<dyn LoggerTrait>, errors: Arc<ErrorLogger>) -> Self {
        Self { config, logger, errors }
    }

    /// 搜索所有词，全部任务结束后返回
    pub fn run(&self, terms: &[String], reporter: &ReportSender) -> SearchStats {
        let config = &self.config;
        let scheduler = TaskScheduler::new(config.max_concurrency, Arc::clone(&self.errors));
        let totals = Mutex::new(WalkStats::default());

        let tasks: Vec<SearchTerm> = terms.iter().map(|term| SearchTerm::new(term)).collect();

        if self.logger.is_enabled() {
            let _ = self.logger.log_message(&format!(
                "开始搜索: 目录 {} | 搜索词 {} 个 | 并发上限 {} | 完整匹配 {}",
                config.base_directory.display(),
                tasks.len(),
                config.max_concurrency,
                config.match_exact
            ));
        }

        let task_stats = scheduler.run(tasks, |index, term| {
            if self.logger.is_enabled() {
                let _ = self.logger.log_message(&format!("任务 {} 开始: {}", index, term));
            }

            let reporter = reporter.clone();
            let stats = file_walker::walk(
                &config.base_directory,
                &term,
                config.match_exact,
                &self.errors,
                &mut |result| reporter.emit(result),
            );

            if self.logger.is_enabled() {
                let _ = self.logger.log_message(&format!(
                    "任务 {} 完成: {} | 目录 {} | 条目 {} | 匹配 {} | 错误 {}",
                    index, term, stats.directories, stats.entries, stats.matches, stats.errors
                ));
            }

            if let Ok(mut totals) = totals.lock() {
                *totals += stats;
            }
        });

        let walk = totals.into_inner().unwrap_or_default();

        SearchStats {
            walk,
            tasks: task_stats,
        }
    }
}
