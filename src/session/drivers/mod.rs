//! Page advance drivers: one per document kind, all behind `PageDriver`.
//!
//! Indexed drivers (slides, sheets) know the page count up front and fail
//! fast past the last page. Stream drivers (word, pdf) never know where the
//! document ends; the session detects the end from a repeated frame.

mod pdf_key;
mod sheet;
mod slide;
mod word;

pub use pdf_key::PdfKeyDriver;
pub use sheet::SheetDriver;
pub use slide::SlideDriver;
pub use word::WordPageDriver;

use crate::config::TimingProfile;
use crate::model::{DriverVariant, KeyChord, WindowHandle};
use crate::services::document_host::OpenDocument;
use crate::services::virtual_device::KeySender;
use crate::services::window_manager::WindowManager;
use std::fmt;
use std::sync::Arc;

use super::pacer::Pacer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced,
    EndOfDocument,
    Failed(String),
}

impl fmt::Display for AdvanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvanceOutcome::Advanced => f.write_str("advanced"),
            AdvanceOutcome::EndOfDocument => f.write_str("end of document"),
            AdvanceOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Состояние сессии, которое нужно драйверу для одного перехода
pub struct AdvanceContext<'a> {
    /// Сколько страниц уже сохранено (текущая включительно)
    pub page_counter: usize,
    pub window: WindowHandle,
    pub document: &'a mut dyn OpenDocument,
}

#[async_trait::async_trait]
pub trait PageDriver: Send {
    fn variant(&self) -> DriverVariant;

    /// Известно только для индексируемых документов
    fn total_pages(&self) -> Option<usize> {
        None
    }

    async fn advance(&mut self, ctx: &mut AdvanceContext<'_>) -> AdvanceOutcome;
}

/// Всё, из чего собираются драйверы
#[derive(Clone)]
pub struct DriverTools {
    pub windows: Arc<dyn WindowManager>,
    pub keys: Arc<dyn KeySender>,
    pub pacer: Pacer,
    pub timing: TimingProfile,
    pub advance_chord: KeyChord,
    pub focus_attempts: u32,
}

pub fn build_driver(
    variant: DriverVariant,
    total_pages: Option<usize>,
    tools: DriverTools,
) -> Box<dyn PageDriver> {
    match variant {
        DriverVariant::SlideSelect => Box::new(SlideDriver::new(total_pages, tools.pacer, tools.timing)),
        DriverVariant::SheetActivate => Box::new(SheetDriver::new(total_pages, tools.pacer, tools.timing)),
        DriverVariant::WordNextPage => Box::new(WordPageDriver::new(tools.pacer, tools.timing)),
        DriverVariant::PdfPageDown => Box::new(PdfKeyDriver::new(tools)),
    }
}

/// Общая логика индексируемых драйверов: показать страницу `page_counter + 1`
async fn select_next(
    ctx: &mut AdvanceContext<'_>,
    total_pages: Option<usize>,
    pacer: &Pacer,
    timing: &TimingProfile,
) -> AdvanceOutcome {
    let next = ctx.page_counter + 1;

    if let Some(total) = total_pages {
        if next > total {
            return AdvanceOutcome::Failed(format!("страница {} за пределами документа ({})", next, total));
        }
    }

    if let Err(e) = ctx.document.select(next).await {
        return AdvanceOutcome::Failed(e.to_string());
    }

    pacer.pause(timing.advance_delay()).await;
    AdvanceOutcome::Advanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::DocumentKind;
    use crate::session::fakes::{FakeKeys, FakeWindows};
    use tokio::time::Duration;

    #[test]
    fn test_build_driver_matches_variant() {
        let config = Config::default();
        let tools = DriverTools {
            windows: Arc::new(FakeWindows::present()),
            keys: Arc::new(FakeKeys::default()),
            pacer: Pacer::new(Duration::from_millis(100)),
            timing: config.timing_for(DocumentKind::Pdf),
            advance_chord: config.advance_chord().unwrap(),
            focus_attempts: 3,
        };

        for kind in [
            DocumentKind::Slides,
            DocumentKind::Sheets,
            DocumentKind::Word,
            DocumentKind::Pdf,
        ] {
            let variant = kind.driver_variant();
            let driver = build_driver(variant, Some(4), tools.clone());
            assert_eq!(driver.variant(), variant);
            assert_eq!(driver.total_pages().is_some(), variant.is_indexed());
        }
    }
}
