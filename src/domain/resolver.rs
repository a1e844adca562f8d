use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 路径解析失败
#[derive(Error, Debug)]
#[error("无法解析路径 {path}: {source}")]
pub struct ResolveError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// 将目录和条目名拼接为规范化的绝对路径（解析 `.`、`..` 和符号链接）
pub fn resolve(base: &Path, child_name: &OsStr) -> Result<PathBuf, ResolveError> {
    let joined = base.join(child_name);

    fs::canonicalize(&joined).map_err(|source| ResolveError {
        path: joined,
        source,
    })
}
