use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置文件名，放在程序同级目录下时自动加载
pub const CONFIG_FILE_NAME: &str = "findname.toml";

/// 配置错误，出现时在开始搜索前退出
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("线程数必须是正整数")]
    InvalidThreads,
    #[error("无法访问搜索目录 {path}: {source}")]
    BaseDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("搜索路径不是目录: {0}")]
    NotADirectory(PathBuf),
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("无法解析配置文件 {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("log_dir 不能为空")]
    EmptyLogDir,
}

/// 一次搜索的运行配置，创建后不再修改，所有任务只读共享
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// 规范化后的搜索根目录
    pub base_directory: PathBuf,
    /// 同时运行的搜索任务上限
    pub max_concurrency: NonZeroUsize,
    /// 是否要求文件名完整匹配
    pub match_exact: bool,
}

impl SearchConfig {
    /// 校验参数并创建配置，搜索目录必须存在且是目录
    pub fn new(base_directory: &Path, max_concurrency: usize, match_exact: bool) -> Result<Self, ConfigError> {
        let max_concurrency = NonZeroUsize::new(max_concurrency).ok_or(ConfigError::InvalidThreads)?;

        let base_directory = fs::canonicalize(base_directory).map_err(|source| ConfigError::BaseDirectory {
            path: base_directory.to_path_buf(),
            source,
        })?;

        if !base_directory.is_dir() {
            return Err(ConfigError::NotADirectory(base_directory));
        }

        Ok(Self {
            base_directory,
            max_concurrency,
            match_exact,
        })
    }
}

/// 应用程序配置（配置文件）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 搜索相关配置
    pub search: SearchSettings,
    /// 性能相关配置
    pub performance: PerformanceConfig,
    /// 日志相关配置
    pub logging: LoggingConfig,
}

/// 搜索默认值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// 默认搜索目录，未设置时使用当前工作目录
    pub default_directory: Option<String>,
    /// 默认是否完整匹配
    pub exact_match: bool,
}

/// 性能配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// 最大并发搜索任务数，未设置时使用逻辑处理器数
    pub threads: Option<usize>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 是否写入调试日志和错误日志
    pub enabled: bool,
    /// 日志文件目录
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: ".".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：优先使用指定文件，其次是程序目录下的 findname.toml，都没有则使用默认值
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(config_path).map_err(|source| ConfigError::ReadFile {
            path: config_path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::ParseFile {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// 获取配置文件的默认路径
    pub fn default_config_path() -> Option<PathBuf> {
        let exe_path = std::env::current_exe().ok()?;
        Some(exe_path.parent()?.join(CONFIG_FILE_NAME))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.performance.threads == Some(0) {
            return Err(ConfigError::InvalidThreads);
        }

        if self.logging.log_dir.trim().is_empty() {
            return Err(ConfigError::EmptyLogDir);
        }

        Ok(())
    }

    /// 合并命令行参数，生成运行配置；命令行参数优先
    ///
    /// `exact` 为 `None` 时使用配置文件中的 `exact_match`。
    pub fn search_config(
        &self,
        directory: Option<&Path>,
        threads: Option<usize>,
        exact: Option<bool>,
    ) -> Result<SearchConfig, ConfigError> {
        let base_directory = match directory {
            Some(dir) => dir.to_path_buf(),
            None => match &self.search.default_directory {
                Some(dir) => PathBuf::from(dir),
                None => std::env::current_dir().map_err(|source| ConfigError::BaseDirectory {
                    path: PathBuf::from("."),
                    source,
                })?,
            },
        };

        let max_concurrency = threads
            .or(self.performance.threads)
            .unwrap_or_else(num_cpus::get);

        let match_exact = exact.unwrap_or(self.search.exact_match);

        SearchConfig::new(&base_directory, max_concurrency, match_exact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.search.default_directory, None);
        assert!(!config.search.exact_match);
        assert_eq!(config.performance.threads, None);
        assert!(!config.logging.enabled);
        assert_eq!(config.logging.log_dir, ".");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("findname.toml");
        fs::write(&config_path, "[performance]\nthreads = 3\n").unwrap();

        let config = Config::load(Some(config_path.as_path())).unwrap();

        assert_eq!(config.performance.threads, Some(3));
        assert_eq!(config.logging.log_dir, ".");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.search.exact_match = true;
        config.performance.threads = Some(4);

        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert!(deserialized.search.exact_match);
        assert_eq!(deserialized.performance.threads, Some(4));
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[performance]\nthreads = \"many\"\n").unwrap();

        let err = Config::load(Some(config_path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFile { .. }));

        let err = Config::load(Some(temp_dir.path().join("missing.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.performance.threads = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreads)));

        config = Config::default();
        config.logging.log_dir = " ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyLogDir)));
    }

    #[test]
    fn test_search_config_command_line_overrides() {
        let temp_dir = tempdir().unwrap();
        let mut config = Config::default();
        config.performance.threads = Some(8);
        config.search.default_directory = Some("/definitely/not/here".to_string());

        let search = config.search_config(Some(temp_dir.path()), Some(2), Some(true)).unwrap();

        assert_eq!(search.base_directory, temp_dir.path().canonicalize().unwrap());
        assert_eq!(search.max_concurrency.get(), 2);
        assert!(search.match_exact);
    }

    #[test]
    fn test_search_config_uses_file_defaults() {
        let temp_dir = tempdir().unwrap();
        let mut config = Config::default();
        config.performance.threads = Some(5);
        config.search.exact_match = true;
        config.search.default_directory = Some(temp_dir.path().to_string_lossy().to_string());

        let search = config.search_config(None, None, None).unwrap();

        assert_eq!(search.base_directory, temp_dir.path().canonicalize().unwrap());
        assert_eq!(search.max_concurrency.get(), 5);
        assert!(search.match_exact);
    }

    #[test]
    fn test_command_line_can_turn_off_exact_match() {
        let temp_dir = tempdir().unwrap();
        let mut config = Config::default();
        config.search.exact_match = true;

        let search = config.search_config(Some(temp_dir.path()), None, Some(false)).unwrap();
        assert!(!search.match_exact);

        let search = config.search_config(Some(temp_dir.path()), None, None).unwrap();
        assert!(search.match_exact);
    }

    #[test]
    fn test_search_config_defaults_to_cpu_count() {
        let temp_dir = tempdir().unwrap();

        let search = Config::default().search_config(Some(temp_dir.path()), None, None).unwrap();

        assert_eq!(search.max_concurrency.get(), num_cpus::get());
        assert!(!search.match_exact);
    }

    #[test]
    fn test_search_config_rejects_bad_input() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "").unwrap();

        assert!(matches!(
            SearchConfig::new(temp_dir.path(), 0, false),
            Err(ConfigError::InvalidThreads)
        ));
        assert!(matches!(
            SearchConfig::new(&temp_dir.path().join("missing"), 1, false),
            Err(ConfigError::BaseDirectory { .. })
        ));
        assert!(matches!(SearchConfig::new(&file, 1, false), Err(ConfigError::NotADirectory(_))));
    }
}
