use crate::error::{PagecapError, Result};
use crate::model::WindowHandle;
use tracing::{debug, info, warn};

use super::r#trait::WindowManager;
use super::wmctrl::WmctrlManager;
use super::xdotool::XdotoolManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaximizeMethod {
    /// EWMH-запрос через оконный менеджер
    Wmctrl,
    /// Ручное перемещение и растяжение окна
    Xdotool,
}

/// Управление окнами X11: xdotool для поиска и фокуса, wmctrl для максимизации и закрытия
pub struct RealWindowManager {
    maximize_method: MaximizeMethod,
    xdotool: XdotoolManager,
    wmctrl: WmctrlManager,
}

impl RealWindowManager {
    pub fn new() -> Result<Self> {
        info!("Инициализация RealWindowManager");

        let xdotool = XdotoolManager::new();
        let wmctrl = WmctrlManager::new();

        if std::env::var_os("DISPLAY").is_none() {
            warn!("Переменная DISPLAY не задана, утилиты X11 могут не увидеть окна");
        }

        if let Err(e) = xdotool.test() {
            warn!("xdotool не отвечает: {}", e);
        }

        let maximize_method = Self::detect_maximize_method(&wmctrl);
        info!("Метод максимизации окон: {:?}", maximize_method);

        Ok(Self {
            maximize_method,
            xdotool,
            wmctrl,
        })
    }

    fn detect_maximize_method(wmctrl: &WmctrlManager) -> MaximizeMethod {
        // wmctrl -m отвечает только при EWMH-совместимом оконном менеджере
        match wmctrl.test() {
            Ok(()) => MaximizeMethod::Wmctrl,
            Err(e) => {
                debug!("wmctrl недоступен ({}), используем xdotool", e);
                MaximizeMethod::Xdotool
            }
        }
    }
}

#[async_trait::async_trait]
impl WindowManager for RealWindowManager {
    async fn find_window(&self, class_hint: &str) -> Result<Option<WindowHandle>> {
        let found = match self.xdotool.search_class(class_hint).await {
            Ok(found) => found,
            Err(PagecapError::ServiceUnavailable(e)) => {
                warn!("xdotool недоступен ({}), ищем через wmctrl", e);
                self.wmctrl.find_by_class(class_hint).await?
            }
            Err(e) => return Err(e),
        };

        if let Some(handle) = found {
            match self.xdotool.describe(handle).await {
                Ok(window) => info!("Найдено окно {}", window),
                Err(_) => info!("Найдено окно #{} (класс '{}')", handle, class_hint),
            }
        }

        Ok(found)
    }

    async fn active_window(&self) -> Result<Option<WindowHandle>> {
        self.xdotool.get_active_window().await
    }

    async fn exists(&self, handle: WindowHandle) -> Result<bool> {
        self.xdotool.exists(handle).await
    }

    async fn maximize(&self, handle: WindowHandle) -> Result<()> {
        match self.maximize_method {
            MaximizeMethod::Wmctrl => self.wmctrl.maximize(handle).await,
            MaximizeMethod::Xdotool => self.xdotool.maximize(handle).await,
        }
    }

    async fn focus(&self, handle: WindowHandle) -> Result<()> {
        self.xdotool.activate(handle).await
    }

    async fn close(&self, handle: WindowHandle) -> Result<()> {
        match self.maximize_method {
            MaximizeMethod::Wmctrl => self.wmctrl.close(handle).await,
            MaximizeMethod::Xdotool => self.xdotool.close(handle).await,
        }
    }
}

impl Drop for RealWindowManager {
    fn drop(&mut self) {
        debug!("RealWindowManager завершает работу");
    }
}
