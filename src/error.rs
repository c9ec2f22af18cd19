use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagecapError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Ошибка обработки изображения: {0}")]
    Image(#[from] image::ImageError),

    #[error("Ошибка чтения архива документа: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Ошибка записи таблицы: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Окно приложения не найдено: {0}")]
    WindowNotFound(String),

    #[error("Не удалось вывести окно на передний план: {0}")]
    Focus(String),

    #[error("Ошибка захвата окна: {0}")]
    Capture(String),

    #[error("Не удалось перейти к следующей странице: {0}")]
    Advance(String),

    #[error("Средство захвата недоступно: {0}")]
    CaptureUnavailable(String),

    #[error("Не удалось открыть документ: {0}")]
    DocumentOpen(String),

    #[error("Неподдерживаемый тип документа: {0}")]
    UnsupportedDocument(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Не удалось собрать PDF: {0}")]
    Merge(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl PagecapError {
    /// Ошибки захвата и перелистывания поглощаются циклом сессии,
    /// всё остальное прерывает сессию
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PagecapError::Capture(_) | PagecapError::Advance(_))
    }
}

pub type Result<T> = std::result::Result<T, PagecapError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! pagecap_error {
    (window_not_found, $($arg:tt)*) => {
        $crate::error::PagecapError::WindowNotFound(format!($($arg)*))
    };
    (focus, $($arg:tt)*) => {
        $crate::error::PagecapError::Focus(format!($($arg)*))
    };
    (capture, $($arg:tt)*) => {
        $crate::error::PagecapError::Capture(format!($($arg)*))
    };
    (advance, $($arg:tt)*) => {
        $crate::error::PagecapError::Advance(format!($($arg)*))
    };
    (document_open, $($arg:tt)*) => {
        $crate::error::PagecapError::DocumentOpen(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::PagecapError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::PagecapError::Internal(format!($($arg)*))
    };
}
