use std::io::{self, Write};
use std::time::Instant;

use crate::domain::MatchResult;

/// 格式化持续时间
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 输出一条匹配结果: `[<绝对路径>]`
///
/// 整行先拼好再一次写出。
pub fn write_match_line<W: Write>(out: &mut W, result: &MatchResult) -> io::Result<()> {
    let line = format!("[{}]\n", result.absolute_path.display());
    out.write_all(line.as_bytes())
}

/// 搜索摘要
pub struct SearchSummary {
    pub start_time: Instant,
    pub total_terms: usize,
    pub directories: u64,
    pub entries: u64,
    pub total_matches: u64,
    pub errors: usize,
}

impl SearchSummary {
    pub fn new(total_terms: usize) -> Self {
        Self {
            start_time: Instant::now(),
            total_terms,
            directories: 0,
            entries: 0,
            total_matches: 0,
            errors: 0,
        }
    }

    /// 输出到标准错误，不干扰标准输出中的结果
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let duration = self.start_time.elapsed();

        writeln!(out, "\n搜索摘要:")?;
        writeln!(out, "----------------------------")?;
        writeln!(out, "总用时: {}", format_duration(duration))?;
        writeln!(out, "搜索词: {}", self.total_terms)?;
        writeln!(out, "遍历目录: {}", self.directories)?;
        writeln!(out, "检查条目: {}", self.entries)?;
        writeln!(out, "匹配项数: {}", self.total_matches)?;
        writeln!(out, "错误数: {}", self.errors)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1234)), "1.234s");
        assert_eq!(format_duration(Duration::from_secs(123)), "2m 3s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 2m 3s");
    }

    #[test]
    fn test_write_match_line() {
        let mut out = Vec::new();
        let result = MatchResult {
            absolute_path: PathBuf::from("/root/sub/A.TXT"),
            term: "a".to_string(),
        };

        write_match_line(&mut out, &result).unwrap();

        assert_eq!(out, b"[/root/sub/A.TXT]\n");
    }

    #[test]
    fn test_summary_print() {
        let mut summary = SearchSummary::new(2);
        summary.total_matches = 5;
        summary.errors = 1;

        let mut out = Vec::new();
        summary.print(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("搜索词: 2"));
        assert!(text.contains("匹配项数: 5"));
        assert!(text.contains("错误数: 1"));
    }
}
