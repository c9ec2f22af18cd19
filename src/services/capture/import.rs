use crate::error::{PagecapError, Result};
use crate::pagecap_error;
use crate::model::WindowHandle;
use crate::utils::command::{create_command, find_in_path};
use image::DynamicImage;
use tracing::{debug, info};

use super::r#trait::CaptureProvider;

const IMPORT_BINARY: &str = "import";

/// Захват окна утилитой ImageMagick `import -window <id> png:-`
pub struct ImportCapture;

impl ImportCapture {
    pub fn new() -> Result<Self> {
        match find_in_path(IMPORT_BINARY) {
            Some(path) => {
                info!("Захват окон через {:?}", path);
                Ok(Self)
            }
            None => Err(PagecapError::CaptureUnavailable(
                "утилита ImageMagick 'import' не найдена в PATH".to_string(),
            )),
        }
    }
}

#[async_trait::async_trait]
impl CaptureProvider for ImportCapture {
    async fn capture(&self, handle: WindowHandle) -> Result<DynamicImage> {
        let id = handle.to_string();
        let output = create_command(IMPORT_BINARY, &["-silent", "-window", &id, "png:-"])
            .output()
            .map_err(|e| pagecap_error!(capture, "не удалось запустить import: {}", e))?;

        if !output.status.success() || output.stdout.is_empty() {
            return Err(pagecap_error!(
                capture,
                "import для окна #{} завершился с ошибкой: {}",
                handle,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let image = image::load_from_memory(&output.stdout)
            .map_err(|e| pagecap_error!(capture, "повреждённый снимок окна #{}: {}", handle, e))?;

        debug!("Снимок окна #{}: {}x{}", handle, image.width(), image.height());
        Ok(image)
    }
}
