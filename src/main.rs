use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use findname::application::{Config, SearchEngine};
use findname::infrastructure::{ErrorLogger, Logger, LoggerTrait};
use findname::presentation::{Reporter, SearchSummary};

/// 按文件名并行查找文件的命令行工具
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 要查找的文件名片段，每个搜索词独立遍历整个目录树
    #[clap(required = true)]
    terms: Vec<String>,

    /// 起始搜索目录 (默认: 当前工作目录)
    #[clap(short = 'd', long = "directory")]
    directory: Option<PathBuf>,

    /// 只输出文件名完整匹配的结果 (忽略大小写)
    #[clap(short, long)]
    exact: bool,

    /// 使用子串匹配，覆盖配置文件中的 exact_match
    #[clap(long, conflicts_with = "exact")]
    substring: bool,

    /// 最大并发搜索任务数 (默认: 逻辑处理器数)
    #[clap(short = 't', long = "threads")]
    threads: Option<usize>,

    /// 配置文件路径 (默认: 程序同级目录下的 findname.toml)
    #[clap(long)]
    config: Option<PathBuf>,

    /// 启用调试日志和错误日志
    #[clap(long)]
    log: bool,

    /// 搜索结束后在标准错误输出摘要
    #[clap(long)]
    stats: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 配置错误在开始搜索前直接退出
    let config = Config::load(args.config.as_deref()).context("加载配置失败")?;
    let exact = match (args.exact, args.substring) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let search_config = config
        .search_config(args.directory.as_deref(), args.threads, exact)
        .context("无效的搜索参数")?;

    // 初始化日志记录器
    let log_enabled = args.log || config.logging.enabled;
    let log_dir = PathBuf::from(&config.logging.log_dir);
    let logger = Arc::new(Logger::new(log_enabled, &log_dir)?);
    let errors = Arc::new(ErrorLogger::new(log_enabled, &log_dir)?);
    let shared_logger: Arc<dyn LoggerTrait> = logger.clone();

    if logger.is_enabled() {
        eprintln!("调试日志: {}", logger.log_path().display());
        logger.log_message(&format!("配置: {:?}", config))?;
    }

    let mut summary = SearchSummary::new(args.terms.len());

    // 结果由单独的写线程输出到标准输出
    let reporter = Reporter::spawn(BufWriter::new(io::stdout()), Arc::clone(&shared_logger))?;
    let sender = reporter.sender();

    let engine = SearchEngine::new(search_config, Arc::clone(&shared_logger), Arc::clone(&errors));
    let stats = engine.run(&args.terms, &sender);

    drop(sender);
    let (_, written) = reporter.finalize()?;

    summary.directories = stats.walk.directories;
    summary.entries = stats.walk.entries;
    summary.total_matches = written;
    summary.errors = errors.get_total_errors();

    let duration = summary.start_time.elapsed();
    logger.finalize(args.terms.len(), written, summary.errors, duration)?;
    errors.finalize()?;

    if args.stats {
        summary.print(&mut io::stderr())?;
        if errors.has_errors() && !errors.error_path().as_os_str().is_empty() {
            eprintln!("详细错误信息请查看: {}", errors.error_path().display());
        }
    }

    Ok(())
}
