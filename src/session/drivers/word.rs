use crate::config::TimingProfile;
use crate::model::DriverVariant;
use crate::session::pacer::Pacer;
use tracing::debug;

use super::{AdvanceContext, AdvanceOutcome, PageDriver};

/// Переход к следующей странице текстового документа.
///
/// Количество страниц заранее неизвестно; ошибка навигации означает конец документа.
pub struct WordPageDriver {
    pacer: Pacer,
    timing: TimingProfile,
}

impl WordPageDriver {
    pub fn new(pacer: Pacer, timing: TimingProfile) -> Self {
        Self { pacer, timing }
    }
}

#[async_trait::async_trait]
impl PageDriver for WordPageDriver {
    fn variant(&self) -> DriverVariant {
        DriverVariant::WordNextPage
    }

    async fn advance(&mut self, ctx: &mut AdvanceContext<'_>) -> AdvanceOutcome {
        if let Err(e) = ctx.document.next_page().await {
            debug!("Переход после страницы {} не удался: {}", ctx.page_counter, e);
            return AdvanceOutcome::EndOfDocument;
        }

        self.pacer.pause(self.timing.advance_delay()).await;
        AdvanceOutcome::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::DocumentKind;
    use crate::services::document_host::DocumentHost;
    use crate::session::fakes::{FakeHost, FakeWindows};
    use std::path::Path;
    use tokio::time::{Duration, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_navigation_error_is_end_of_document() {
        let host = FakeHost::stream_ending_after(1);
        let mut document = host.open(Path::new("report.docx"), DocumentKind::Word).await.unwrap();
        let config = Config::default();
        let mut driver = WordPageDriver::new(
            Pacer::new(Duration::from_millis(100)),
            config.timing_for(DocumentKind::Word),
        );
        assert_eq!(driver.total_pages(), None);

        let start = Instant::now();
        let mut ctx = AdvanceContext {
            page_counter: 1,
            window: FakeWindows::HANDLE,
            document: document.as_mut(),
        };
        assert_eq!(driver.advance(&mut ctx).await, AdvanceOutcome::Advanced);
        assert!(start.elapsed() >= Duration::from_millis(2000));

        ctx.page_counter = 2;
        assert_eq!(driver.advance(&mut ctx).await, AdvanceOutcome::EndOfDocument);
    }
}
