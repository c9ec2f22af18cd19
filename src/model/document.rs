use crate::error::{PagecapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Тип документа, определяет приложение-хост и способ перелистывания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Slides,
    Sheets,
    Word,
    Pdf,
}

impl DocumentKind {
    /// Определить тип документа по расширению файла
    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "ppt" | "pptx" | "odp" => Ok(Self::Slides),
            "xls" | "xlsx" | "ods" => Ok(Self::Sheets),
            "doc" | "docx" | "odt" | "rtf" => Ok(Self::Word),
            "pdf" => Ok(Self::Pdf),
            _ => Err(PagecapError::UnsupportedDocument(format!(
                "{} (расширение '{}')",
                path.display(),
                extension
            ))),
        }
    }

    /// Механизм перелистывания фиксируется один раз при старте сессии
    pub fn driver_variant(self) -> DriverVariant {
        match self {
            Self::Slides => DriverVariant::SlideSelect,
            Self::Sheets => DriverVariant::SheetActivate,
            Self::Word => DriverVariant::WordNextPage,
            Self::Pdf => DriverVariant::PdfPageDown,
        }
    }

    /// Суффикс каталога результатов: `<имя><суффикс>`
    pub fn output_suffix(self) -> &'static str {
        match self {
            Self::Slides => "",
            Self::Sheets => "_Excel",
            Self::Word => "_Word",
            Self::Pdf => "_PDF",
        }
    }

    pub fn is_indexed(self) -> bool {
        self.driver_variant().is_indexed()
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Slides => "slides",
            Self::Sheets => "sheets",
            Self::Word => "word",
            Self::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

/// Неизменяемый дескриптор механизма перехода к следующей странице
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverVariant {
    /// Выбор слайда по индексу
    SlideSelect,
    /// Активация листа по индексу
    SheetActivate,
    /// Переход "к следующей странице" в текстовом редакторе
    WordNextPage,
    /// Синтетическое нажатие PageDown в окне просмотрщика
    PdfPageDown,
}

impl DriverVariant {
    /// Индексируемые форматы знают количество страниц заранее
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::SlideSelect | Self::SheetActivate)
    }
}
