use crate::config::Config;
use crate::error::Result;
use crate::pagecap_error;
use crate::model::{DocumentKind, WindowHandle};
use crate::services::window_manager::WindowManager;
use crate::utils::command::create_command;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tracing::{info, warn};

use super::r#trait::{DocumentHost, OpenDocument};

/// PDF открывается в просмотрщике по умолчанию (`xdg-open`).
///
/// Процесс xdg-open сразу отдаёт документ другому приложению, поэтому
/// закрывать приходится окно, а не процесс.
pub struct ViewerHost {
    viewer_command: String,
    windows: Arc<dyn WindowManager>,
}

impl ViewerHost {
    pub fn new(config: Arc<Config>, windows: Arc<dyn WindowManager>) -> Self {
        Self {
            viewer_command: config.host.viewer_command.clone(),
            windows,
        }
    }
}

#[async_trait::async_trait]
impl DocumentHost for ViewerHost {
    async fn open(&self, path: &Path, kind: DocumentKind) -> Result<Box<dyn OpenDocument>> {
        if !path.is_file() {
            return Err(pagecap_error!(document_open, "файл {} не найден", path.display()));
        }

        let path_arg = path.to_string_lossy();
        info!("Открытие {} ({}) через {}", path.display(), kind, self.viewer_command);

        let status = create_command(&self.viewer_command, &[path_arg.as_ref()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| pagecap_error!(document_open, "не удалось запустить {}: {}", self.viewer_command, e))?;

        if !status.success() {
            return Err(pagecap_error!(
                document_open,
                "{} завершился с кодом {}",
                self.viewer_command,
                status
            ));
        }

        Ok(Box::new(ViewerDocument {
            window: None,
            windows: self.windows.clone(),
        }))
    }
}

pub struct ViewerDocument {
    window: Option<WindowHandle>,
    windows: Arc<dyn WindowManager>,
}

#[async_trait::async_trait]
impl OpenDocument for ViewerDocument {
    fn page_count(&self) -> Option<usize> {
        None
    }

    fn attach(&mut self, window: WindowHandle) {
        self.window = Some(window);
    }

    async fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    async fn select(&mut self, index: usize) -> Result<()> {
        Err(pagecap_error!(internal, "просмотрщик не умеет переходить к странице {}", index))
    }

    /// Листание идёт нажатиями клавиш через драйвер, сам просмотрщик его не делает
    async fn next_page(&mut self) -> Result<()> {
        Err(pagecap_error!(internal, "просмотрщик листается только клавишами"))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        match self.window {
            Some(window) => {
                info!("Закрытие просмотрщика #{}", window);
                self.windows.close(window).await
            }
            None => {
                warn!("Окно просмотрщика не было найдено, закрывать нечего");
                Ok(())
            }
        }
    }
}
