use std::fmt;
use std::path::{Path, PathBuf};

/// Отпечаток содержимого сохранённой страницы (hex SHA-256)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Короткая форма для логов
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Сохранённое изображение одной страницы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageArtifact {
    pub index: usize,
    pub path: PathBuf,
}

impl PageArtifact {
    /// Имя файла: `<prefix>_page_NNN.<ext>`, NNN с 1 и с ведущими нулями до трёх знаков
    pub fn file_name(prefix: &str, index: usize, extension: &str) -> String {
        format!("{}_page_{:03}.{}", prefix, index, extension)
    }

    /// Извлечь номер страницы из имени, созданного `file_name`
    pub fn parse_index(path: &Path, prefix: &str) -> Option<usize> {
        let stem = path.file_stem()?.to_str()?;
        let digits = stem.strip_prefix(prefix)?.strip_prefix("_page_")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for PageArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.index, self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_zero_padded() {
        assert_eq!(PageArtifact::file_name("report", 1, "png"), "report_page_001.png");
        assert_eq!(PageArtifact::file_name("report", 42, "jpg"), "report_page_042.jpg");
        assert_eq!(PageArtifact::file_name("report", 500, "png"), "report_page_500.png");
    }

    #[test]
    fn test_parse_index() {
        let path = PathBuf::from("/tmp/out/report_page_007.png");
        assert_eq!(PageArtifact::parse_index(&path, "report"), Some(7));
        assert_eq!(PageArtifact::parse_index(&path, "other"), None);
        assert_eq!(PageArtifact::parse_index(&PathBuf::from("report_page_x1.png"), "report"), None);
    }

    #[test]
    fn test_fingerprint_short() {
        let fp = Fingerprint::new("0123456789abcdef0123");
        assert_eq!(fp.short(), "0123456789ab");
        assert_eq!(Fingerprint::new("abc").short(), "abc");
    }
}
