use crate::error::{PagecapError, Result};
use crate::model::{DocumentKind, WindowHandle};
use crate::services::simulated_screen::SimulatedScreen;
use std::path::Path;
use tracing::info;

use super::r#trait::{DocumentHost, OpenDocument};

/// Хост без внешних приложений: документ живёт на симулированном экране
pub struct DryRunDocumentHost {
    screen: SimulatedScreen,
}

impl DryRunDocumentHost {
    pub fn new(screen: SimulatedScreen) -> Self {
        info!("Dry-run режим - DocumentHost работает в режиме эмуляции");
        Self { screen }
    }
}

#[async_trait::async_trait]
impl DocumentHost for DryRunDocumentHost {
    async fn open(&self, path: &Path, kind: DocumentKind) -> Result<Box<dyn OpenDocument>> {
        info!(
            "[DRY RUN] Открытие {} как '{}' ({} стр.)",
            path.display(),
            kind,
            self.screen.total_pages()
        );
        self.screen.select(1);
        Ok(Box::new(DryRunDocument {
            kind,
            screen: self.screen.clone(),
        }))
    }
}

pub struct DryRunDocument {
    kind: DocumentKind,
    screen: SimulatedScreen,
}

#[async_trait::async_trait]
impl OpenDocument for DryRunDocument {
    fn page_count(&self) -> Option<usize> {
        self.kind.is_indexed().then(|| self.screen.total_pages())
    }

    fn attach(&mut self, window: WindowHandle) {
        info!("[DRY RUN] Документ привязан к окну #{}", window);
    }

    async fn prepare(&mut self) -> Result<()> {
        self.screen.select(1);
        Ok(())
    }

    async fn select(&mut self, index: usize) -> Result<()> {
        if self.screen.select(index) {
            Ok(())
        } else {
            Err(PagecapError::Advance(format!(
                "страницы {} нет (всего {})",
                index,
                self.screen.total_pages()
            )))
        }
    }

    async fn next_page(&mut self) -> Result<()> {
        if self.screen.current_page() >= self.screen.total_pages() {
            return Err(PagecapError::Advance("конец документа".to_string()));
        }
        self.screen.scroll_forward();
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        info!("[DRY RUN] Закрытие документа ({})", self.kind);
        Ok(())
    }
}
