use std::fmt;

/// 搜索词（创建时统一转换为小写，之后不再修改）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    original: String,
    normalized: String,
}

impl SearchTerm {
    /// 从用户输入创建搜索词，不会修改调用方的字符串
    pub fn new(input: &str) -> Self {
        Self {
            original: input.to_string(),
            normalized: input.to_ascii_lowercase(),
        }
    }

    /// 小写形式，用于匹配
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// 用户输入的原始形式，用于日志
    pub fn original(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// 判断文件名是否匹配搜索词（ASCII 大小写不敏感）
///
/// `exact` 为真时要求完整相等，否则要求搜索词是文件名的连续子串。
pub fn matches(entry_name: &str, term: &SearchTerm, exact: bool) -> bool {
    if exact {
        return entry_name.eq_ignore_ascii_case(term.as_str());
    }

    entry_name.to_ascii_lowercase().contains(term.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_is_normalized_copy() {
        let input = String::from("ReadMe.MD");
        let term = SearchTerm::new(&input);

        assert_eq!(term.as_str(), "readme.md");
        assert_eq!(term.original(), "ReadMe.MD");
        // 调用方的字符串保持不变
        assert_eq!(input, "ReadMe.MD");
    }

    #[test]
    fn test_substring_match() {
        let term = SearchTerm::new("a");

        assert!(matches("a.txt", &term, false));
        assert!(matches("A.TXT", &term, false));
        assert!(matches("data.bin", &term, false));
        assert!(!matches("b.log", &term, false));
    }

    #[test]
    fn test_exact_match() {
        let term = SearchTerm::new("a.txt");

        assert!(matches("a.txt", &term, true));
        assert!(matches("A.TXT", &term, true));
        assert!(!matches("a.txt.bak", &term, true));
        assert!(!matches("xa.txt", &term, true));
    }

    #[test]
    fn test_mixed_case_term() {
        let term = SearchTerm::new("CONFIG");

        assert!(matches("app_config.toml", &term, false));
        assert!(matches("Config", &term, true));
    }

    #[test]
    fn test_empty_term_matches_everything_in_substring_mode() {
        let term = SearchTerm::new("");

        assert!(matches("anything", &term, false));
        assert!(!matches("anything", &term, true));
    }

    #[test]
    fn test_non_ascii_names_are_compared_bytewise() {
        let term = SearchTerm::new("文档");

        assert!(matches("项目文档.txt", &term, false));
        assert!(!matches("项目.txt", &term, false));
    }
}
