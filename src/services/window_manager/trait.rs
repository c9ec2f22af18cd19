use crate::error::Result;
use crate::model::WindowHandle;
use std::sync::Arc;

/// Операции над окнами приложения-хоста
#[async_trait::async_trait]
pub trait WindowManager: Send + Sync {
    /// Первое видимое окно, класс которого содержит `class_hint`
    async fn find_window(&self, class_hint: &str) -> Result<Option<WindowHandle>>;

    /// Окно, которое сейчас имеет фокус ввода
    async fn active_window(&self) -> Result<Option<WindowHandle>>;

    /// Окно с таким идентификатором всё ещё существует
    async fn exists(&self, handle: WindowHandle) -> Result<bool>;

    async fn maximize(&self, handle: WindowHandle) -> Result<()>;

    async fn focus(&self, handle: WindowHandle) -> Result<()>;

    /// Вежливая просьба закрыться (аналог WM_CLOSE)
    async fn close(&self, handle: WindowHandle) -> Result<()>;
}

/// Factory function to create an appropriate window manager based on the dry_run flag
pub fn create_window_manager(dry_run: bool) -> Result<Arc<dyn WindowManager>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunWindowManager::new()))
    } else {
        Ok(Arc::new(super::window_manager::RealWindowManager::new()?))
    }
}
