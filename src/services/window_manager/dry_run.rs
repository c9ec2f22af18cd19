use crate::error::Result;
use crate::model::WindowHandle;
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::WindowManager;

/// Идентификатор единственного эмулируемого окна
pub const DRY_RUN_WINDOW: WindowHandle = WindowHandle(0xD0C);

/// Одно эмулируемое окно, которое всегда находится и всегда в фокусе, пока не закрыто
pub struct DryRunWindowManager {
    closed: Mutex<bool>,
}

impl DryRunWindowManager {
    pub fn new() -> Self {
        info!("Dry-run режим - WindowManager работает в режиме эмуляции");
        Self {
            closed: Mutex::new(false),
        }
    }
}

#[async_trait::async_trait]
impl WindowManager for DryRunWindowManager {
    async fn find_window(&self, class_hint: &str) -> Result<Option<WindowHandle>> {
        if *self.closed.lock() {
            return Ok(None);
        }
        info!("[DRY RUN] Окно '{}' -> #{}", class_hint, DRY_RUN_WINDOW);
        Ok(Some(DRY_RUN_WINDOW))
    }

    async fn active_window(&self) -> Result<Option<WindowHandle>> {
        Ok((!*self.closed.lock()).then_some(DRY_RUN_WINDOW))
    }

    async fn exists(&self, handle: WindowHandle) -> Result<bool> {
        Ok(handle == DRY_RUN_WINDOW && !*self.closed.lock())
    }

    async fn maximize(&self, handle: WindowHandle) -> Result<()> {
        info!("[DRY RUN] Максимизация окна #{}", handle);
        Ok(())
    }

    async fn focus(&self, handle: WindowHandle) -> Result<()> {
        info!("[DRY RUN] Фокус на окно #{}", handle);
        Ok(())
    }

    async fn close(&self, handle: WindowHandle) -> Result<()> {
        info!("[DRY RUN] Закрытие окна #{}", handle);
        *self.closed.lock() = true;
        Ok(())
    }
}
