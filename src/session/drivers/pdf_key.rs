use crate::model::{DriverVariant, WindowHandle};
use crate::debug_if_enabled;
use tracing::warn;

use super::{AdvanceContext, AdvanceOutcome, DriverTools, PageDriver};

/// Листание PDF клавишей: перед каждым нажатием фокус подтверждается заново,
/// иначе клавиша уйдёт в чужое окно
pub struct PdfKeyDriver {
    tools: DriverTools,
}

impl PdfKeyDriver {
    pub fn new(tools: DriverTools) -> Self {
        Self { tools }
    }

    async fn reaffirm_focus(&self, window: WindowHandle) -> bool {
        for attempt in 1..=self.tools.focus_attempts {
            if let Err(e) = self.tools.windows.focus(window).await {
                debug_if_enabled!("Попытка {} сфокусировать #{}: {}", attempt, window, e);
            }

            self.tools.pacer.pause(self.tools.timing.focus_delay()).await;

            match self.tools.windows.active_window().await {
                Ok(Some(active)) if active == window => return true,
                Ok(active) => {
                    debug_if_enabled!("Попытка {}: активно окно {:?} вместо #{}", attempt, active, window)
                }
                Err(e) => debug_if_enabled!("Попытка {}: активное окно не определено: {}", attempt, e),
            }
        }
        false
    }
}

#[async_trait::async_trait]
impl PageDriver for PdfKeyDriver {
    fn variant(&self) -> DriverVariant {
        DriverVariant::PdfPageDown
    }

    async fn advance(&mut self, ctx: &mut AdvanceContext<'_>) -> AdvanceOutcome {
        if !self.reaffirm_focus(ctx.window).await {
            warn!(
                "Окно #{} не получило фокус за {} попыток",
                ctx.window, self.tools.focus_attempts
            );
            return AdvanceOutcome::Failed(format!("окно #{} не в фокусе", ctx.window));
        }

        if let Err(e) = self.tools.keys.tap(&self.tools.advance_chord) {
            return AdvanceOutcome::Failed(e.to_string());
        }

        self.tools.pacer.pause(self.tools.timing.advance_delay()).await;
        AdvanceOutcome::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::{DocumentKind, KeyChord};
    use crate::services::document_host::DocumentHost;
    use crate::session::fakes::{FakeHost, FakeKeys, FakeWindows};
    use crate::session::pacer::Pacer;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::time::Duration;

    fn driver(windows: Arc<FakeWindows>, keys: Arc<FakeKeys>) -> PdfKeyDriver {
        let config = Config::default();
        PdfKeyDriver::new(DriverTools {
            windows,
            keys,
            pacer: Pacer::new(Duration::from_millis(100)),
            timing: config.timing_for(DocumentKind::Pdf),
            advance_chord: config.advance_chord().unwrap(),
            focus_attempts: config.input.focus_attempts,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_focuses_then_sends_page_down() {
        let windows = Arc::new(FakeWindows::present());
        let keys = Arc::new(FakeKeys::default());
        let host = FakeHost::stream();
        let mut document = host.open(Path::new("a.pdf"), DocumentKind::Pdf).await.unwrap();

        let mut ctx = AdvanceContext {
            page_counter: 1,
            window: FakeWindows::HANDLE,
            document: document.as_mut(),
        };
        let outcome = driver(windows.clone(), keys.clone()).advance(&mut ctx).await;

        assert_eq!(outcome, AdvanceOutcome::Advanced);
        assert_eq!(windows.focus_calls(), 1);
        assert_eq!(keys.taps(), vec![KeyChord::parse("pagedown").unwrap()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_focus_attempts() {
        let windows = Arc::new(FakeWindows::present().never_active());
        let keys = Arc::new(FakeKeys::default());
        let host = FakeHost::stream();
        let mut document = host.open(Path::new("a.pdf"), DocumentKind::Pdf).await.unwrap();

        let mut ctx = AdvanceContext {
            page_counter: 1,
            window: FakeWindows::HANDLE,
            document: document.as_mut(),
        };
        let outcome = driver(windows.clone(), keys.clone()).advance(&mut ctx).await;

        assert!(matches!(outcome, AdvanceOutcome::Failed(_)));
        assert_eq!(windows.focus_calls(), 3);
        assert_eq!(keys.tap_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_is_failure() {
        let windows = Arc::new(FakeWindows::present());
        let keys = Arc::new(FakeKeys::failing());
        let host = FakeHost::stream();
        let mut document = host.open(Path::new("a.pdf"), DocumentKind::Pdf).await.unwrap();

        let mut ctx = AdvanceContext {
            page_counter: 1,
            window: FakeWindows::HANDLE,
            document: document.as_mut(),
        };
        let outcome = driver(windows, keys).advance(&mut ctx).await;
        assert!(matches!(outcome, AdvanceOutcome::Failed(_)));
    }
}
