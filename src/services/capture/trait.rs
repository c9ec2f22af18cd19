use crate::error::Result;
use crate::model::WindowHandle;
use crate::services::simulated_screen::SimulatedScreen;
use image::DynamicImage;
use std::sync::Arc;

/// Снимок текущего содержимого окна
#[async_trait::async_trait]
pub trait CaptureProvider: Send + Sync {
    async fn capture(&self, handle: WindowHandle) -> Result<DynamicImage>;
}

/// Factory function to create a capture provider based on the dry_run flag.
///
/// Ошибка здесь фатальна для сессии: без средства захвата работать нечем.
pub fn create_capture_provider(
    screen: SimulatedScreen,
    dry_run: bool,
) -> Result<Arc<dyn CaptureProvider>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunCapture::new(screen)))
    } else {
        Ok(Arc::new(super::import::ImportCapture::new()?))
    }
}
