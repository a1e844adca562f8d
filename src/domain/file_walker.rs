use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use crate::domain::matcher::{self, SearchTerm};
use crate::domain::resolver;
use crate::infrastructure::{ErrorLogger, ErrorType};

/// 匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// 规范化后的绝对路径
    pub absolute_path: PathBuf,
    /// 产生该结果的搜索词（原始形式）
    pub term: String,
}

/// 单次遍历的统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub directories: u64,
    pub entries: u64,
    pub matches: u64,
    pub errors: u64,
}

impl AddAssign for WalkStats {
    fn add_assign(&mut self, other: Self) {
        self.directories += other.directories;
        self.entries += other.entries;
        self.matches += other.matches;
        self.errors += other.errors;
    }
}

/// 从 `root` 开始深度优先遍历，对每个非目录条目用 `term` 做文件名匹配
///
/// 遍历期间的错误只影响出错的子树或条目：记录到 `errors` 后继续。
/// 目录按文件系统返回的顺序访问，不排序；符号链接不会被当作目录进入。
pub fn walk<F>(root: &Path, term: &SearchTerm, exact: bool, errors: &ErrorLogger, emit: &mut F) -> WalkStats
where
    F: FnMut(MatchResult),
{
    let mut stats = WalkStats::default();
    walk_dir(root, term, exact, errors, emit, &mut stats);
    stats
}

fn walk_dir<F>(
    path: &Path,
    term: &SearchTerm,
    exact: bool,
    errors: &ErrorLogger,
    emit: &mut F,
    stats: &mut WalkStats,
) where
    F: FnMut(MatchResult),
{
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            stats.errors += 1;
            let _ = errors.log_error(ErrorType::DirectoryOpen, Some(path), &err.to_string());
            return;
        }
    };
    stats.directories += 1;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                stats.errors += 1;
                let _ = errors.log_error(ErrorType::DirectoryRead, Some(path), &err.to_string());
                continue;
            }
        };

        let name = entry.file_name();
        if name == "." || name == ".." {
            continue;
        }
        stats.entries += 1;

        // 与 readdir 的 d_type 一致：不跟随符号链接，类型未知时按文件处理
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(err) => {
                stats.errors += 1;
                let _ = errors.log_error(ErrorType::DirectoryRead, Some(entry.path().as_path()), &err.to_string());
                false
            }
        };

        if is_dir {
            walk_dir(&path.join(&name), term, exact, errors, emit, stats);
            continue;
        }

        if !matcher::matches(&name.to_string_lossy(), term, exact) {
            continue;
        }

        match resolver::resolve(path, &name) {
            Ok(absolute_path) => {
                stats.matches += 1;
                emit(MatchResult {
                    absolute_path,
                    term: term.original().to_string(),
                });
            }
            Err(err) => {
                stats.errors += 1;
                let _ = errors.log_error(ErrorType::PathResolution, Some(err.path.as_path()), &err.source.to_string());
            }
        }
    }
}
