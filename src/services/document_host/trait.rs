use crate::config::Config;
use crate::error::Result;
use crate::model::{DocumentKind, WindowHandle};
use crate::services::simulated_screen::SimulatedScreen;
use crate::services::virtual_device::KeySender;
use crate::services::window_manager::WindowManager;
use std::path::Path;
use std::sync::Arc;

/// Открытый в приложении-хосте документ.
///
/// Сессия владеет им целиком и обязана вызвать `close` на любом пути выхода.
#[async_trait::async_trait]
pub trait OpenDocument: Send {
    /// Количество страниц, известное заранее (только для индексируемых форматов)
    fn page_count(&self) -> Option<usize>;

    /// Привязать найденное окно приложения к документу
    fn attach(&mut self, window: WindowHandle);

    /// Подготовка вида перед первым захватом; ошибка здесь не фатальна
    async fn prepare(&mut self) -> Result<()>;

    /// Показать страницу с номером `index` (с 1)
    async fn select(&mut self, index: usize) -> Result<()>;

    /// Перейти к следующей странице
    async fn next_page(&mut self) -> Result<()>;

    async fn close(self: Box<Self>) -> Result<()>;
}

#[async_trait::async_trait]
pub trait DocumentHost: Send + Sync {
    async fn open(&self, path: &Path, kind: DocumentKind) -> Result<Box<dyn OpenDocument>>;
}

/// Factory function to create a document host based on the dry_run flag.
///
/// Настоящий хост маршрутизирует PDF в просмотрщик, остальное в LibreOffice.
pub fn create_document_host(
    config: Arc<Config>,
    windows: Arc<dyn WindowManager>,
    keys: Arc<dyn KeySender>,
    screen: SimulatedScreen,
    dry_run: bool,
) -> Result<Arc<dyn DocumentHost>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunDocumentHost::new(screen)))
    } else {
        Ok(Arc::new(RoutingHost {
            office: super::libreoffice::LibreOfficeHost::new(config.clone(), windows.clone(), keys)?,
            viewer: super::viewer::ViewerHost::new(config, windows),
        }))
    }
}

struct RoutingHost {
    office: super::libreoffice::LibreOfficeHost,
    viewer: super::viewer::ViewerHost,
}

#[async_trait::async_trait]
impl DocumentHost for RoutingHost {
    async fn open(&self, path: &Path, kind: DocumentKind) -> Result<Box<dyn OpenDocument>> {
        match kind {
            DocumentKind::Pdf => self.viewer.open(path, kind).await,
            _ => self.office.open(path, kind).await,
        }
    }
}
