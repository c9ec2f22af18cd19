use crate::config::TimingProfile;
use crate::model::DriverVariant;
use crate::session::pacer::Pacer;

use super::{select_next, AdvanceContext, AdvanceOutcome, PageDriver};

/// Активация следующего листа книги
pub struct SheetDriver {
    total_pages: Option<usize>,
    pacer: Pacer,
    timing: TimingProfile,
}

impl SheetDriver {
    pub fn new(total_pages: Option<usize>, pacer: Pacer, timing: TimingProfile) -> Self {
        Self {
            total_pages,
            pacer,
            timing,
        }
    }
}

#[async_trait::async_trait]
impl PageDriver for SheetDriver {
    fn variant(&self) -> DriverVariant {
        DriverVariant::SheetActivate
    }

    fn total_pages(&self) -> Option<usize> {
        self.total_pages
    }

    async fn advance(&mut self, ctx: &mut AdvanceContext<'_>) -> AdvanceOutcome {
        select_next(ctx, self.total_pages, &self.pacer, &self.timing).await
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
    use tokio::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_walks_every_sheet_then_fails() {
        let host = FakeHost::indexed(3);
        let mut document = host.open(Path::new("book.xlsx"), DocumentKind::Sheets).await.unwrap();
        let config = Config::default();
        let mut driver = SheetDriver::new(
            Some(3),
            Pacer::new(Duration::from_millis(100)),
            config.timing_for(DocumentKind::Sheets),
        );

        let mut outcomes = Vec::new();
        for page_counter in 1..=3 {
            let mut ctx = AdvanceContext {
                page_counter,
                window: FakeWindows::HANDLE,
                document: document.as_mut(),
            };
            outcomes.push(driver.advance(&mut ctx).await);
        }

        assert_eq!(outcomes[0], AdvanceOutcome::Advanced);
        assert_eq!(outcomes[1], AdvanceOutcome::Advanced);
        assert!(matches!(outcomes[2], AdvanceOutcome::Failed(_)));
        assert_eq!(*host.log.selected.lock(), vec![2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_count_defers_to_document() {
        let host = FakeHost::stream();
        let mut document = host.open(Path::new("book.xls"), DocumentKind::Sheets).await.unwrap();
        let config = Config::default();
        let mut driver = SheetDriver::new(
            None,
            Pacer::new(Duration::from_millis(100)),
            config.timing_for(DocumentKind::Sheets),
        );

        let mut ctx = AdvanceContext {
            page_counter: 40,
            window: FakeWindows::HANDLE,
            document: document.as_mut(),
        };
        assert_eq!(driver.advance(&mut ctx).await, AdvanceOutcome::Advanced);
        assert_eq!(*host.log.selected.lock(), vec![41]);
    }
}
