use crate::error::{PagecapError, Result};
use crate::model::WindowHandle;
use crate::services::simulated_screen::SimulatedScreen;
use image::DynamicImage;
use tracing::info;

use super::r#trait::CaptureProvider;

/// Рисует текущую страницу симулированного экрана вместо настоящего снимка
pub struct DryRunCapture {
    screen: SimulatedScreen,
}

impl DryRunCapture {
    pub fn new(screen: SimulatedScreen) -> Self {
        info!("Dry-run режим - CaptureProvider работает в режиме эмуляции");
        Self { screen }
    }
}

#[async_trait::async_trait]
impl CaptureProvider for DryRunCapture {
    async fn capture(&self, handle: WindowHandle) -> Result<DynamicImage> {
        if self.screen.total_pages() == 0 {
            return Err(PagecapError::Capture("эмулируемый документ пуст".to_string()));
        }
        info!(
            "[DRY RUN] Снимок окна #{}: страница {}/{}",
            handle,
            self.screen.current_page(),
            self.screen.total_pages()
        );
        Ok(self.screen.render())
    }
}
