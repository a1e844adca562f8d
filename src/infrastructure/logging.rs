use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_match(&self, path: &Path, term: &str) -> Result<()>;
    fn finalize(&self, total_terms: usize, total_matches: u64, total_errors: usize, duration: std::time::Duration) -> Result<()>;
}

/// 调试日志记录器（记录配置、任务进度和匹配结果）
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    log_path: PathBuf,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器，日志文件放在 `log_dir` 下
    pub fn new(enabled: bool, log_dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                log_file: Arc::new(Mutex::new(None)),
                log_path: PathBuf::new(),
                enabled: false,
            });
        }

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("debug_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("无法创建调试日志: {}", log_path.display()))?;

        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?; // UTF-8 BOM

        writeln!(file_clone, "# findname 调试日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# --------------------------------------------")?;
        writeln!(file_clone, "# 搜索配置、任务进度和匹配结果")?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            log_path,
            enabled: true,
        })
    }

    /// 获取日志文件路径
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {}", timestamp, line)?;
                file.flush()?;
            }
        }

        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        self.write_line(message)
    }

    fn log_match(&self, path: &Path, term: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        self.write_line(&format!("匹配: {} | 搜索词: {}", path.display(), term))
    }

    fn finalize(&self, total_terms: usize, total_matches: u64, total_errors: usize, duration: std::time::Duration) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# --------------------------------------------")?;
                writeln!(file, "# 搜索完成时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
                writeln!(file, "# 总用时: {:.3}秒", duration.as_secs_f64())?;
                writeln!(file, "# 搜索词数: {}", total_terms)?;
                writeln!(file, "# 匹配项总数: {}", total_matches)?;
                writeln!(file, "# 错误数: {}", total_errors)?;
                writeln!(file, "# ============================================")?;
                file.flush()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_logger_creation() {
        let temp_dir = tempdir().unwrap();

        let logger = Logger::new(false, temp_dir.path()).unwrap();
        assert!(!logger.is_enabled());

        let logger = Logger::new(true, temp_dir.path()).unwrap();
        assert!(logger.is_enabled());
        assert!(logger.log_path().starts_with(temp_dir.path()));
    }

    #[test]
    fn test_logger_trait() {
        let temp_dir = tempdir().unwrap();
        let logger = Logger::new(true, temp_dir.path()).unwrap();
        let logger_trait: &dyn LoggerTrait = &logger;

        assert!(logger_trait.is_enabled());
        assert!(logger_trait.log_message("test message").is_ok());
        assert!(logger_trait.log_match(Path::new("/data/a.txt"), "a").is_ok());
        assert!(logger_trait.finalize(2, 1, 0, Duration::from_millis(1500)).is_ok());

        let content = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("test message"));
        assert!(content.contains("匹配: /data/a.txt | 搜索词: a"));
        assert!(content.contains("# 匹配项总数: 1"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let logger = Logger::new(false, temp_dir.path()).unwrap();

        logger.log_message("ignored").unwrap();

        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
