use crate::config::TimingProfile;
use crate::error::Result;
use crate::pagecap_error;
use crate::model::WindowHandle;
use crate::services::window_manager::WindowManager;
use std::sync::Arc;
use tracing::{debug, warn};

use super::pacer::Pacer;

/// Приводит окно в состояние, пригодное для снимка: развернуто, в фокусе, дорисовано.
///
/// Вызывается перед каждым захватом, потому что фокус между страницами может уйти.
pub struct Stabilizer {
    windows: Arc<dyn WindowManager>,
    pacer: Pacer,
    timing: TimingProfile,
}

impl Stabilizer {
    pub fn new(windows: Arc<dyn WindowManager>, pacer: Pacer, timing: TimingProfile) -> Self {
        Self {
            windows,
            pacer,
            timing,
        }
    }

    pub async fn stabilize(&self, handle: WindowHandle) -> Result<()> {
        if !self.windows.exists(handle).await? {
            return Err(pagecap_error!(window_not_found, "окно #{} закрыто или не существует", handle));
        }

        if let Err(e) = self.windows.maximize(handle).await {
            warn!("Не удалось развернуть окно #{}: {}", handle, e);
        }

        self.windows
            .focus(handle)
            .await
            .map_err(|e| pagecap_error!(focus, "окно #{}: {}", handle, e))?;

        let windows = &self.windows;
        let focused = self
            .pacer
            .wait_until(self.timing.focus_timeout(), move || async move {
                matches!(windows.active_window().await, Ok(Some(active)) if active == handle)
            })
            .await;

        if !focused {
            return Err(pagecap_error!(
                focus,
                "окно #{} не стало активным за {:?}",
                handle,
                self.timing.focus_timeout()
            ));
        }

        debug!("Окно #{} в фокусе, ждём {:?} до снимка", handle, self.timing.settle());
        self.pacer.pause(self.timing.settle()).await;
        Ok(())
    }
}
