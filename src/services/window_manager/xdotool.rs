use crate::error::{PagecapError, Result};
use crate::pagecap_error;
use crate::model::{WindowHandle, WindowInfo};
use crate::utils::command::{create_command, run_checked};
use tracing::debug;

pub struct XdotoolManager;

impl XdotoolManager {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = create_command("xdotool", &["getactivewindow"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(PagecapError::Internal("xdotool failed".to_string()))
        }
    }

    pub async fn search_class(&self, class_hint: &str) -> Result<Option<WindowHandle>> {
        debug!("Поиск окна с классом '{}' через xdotool", class_hint);
        let output = create_command("xdotool", &["search", "--onlyvisible", "--class", class_hint])
            .output()
            .map_err(|e| pagecap_error!(service_unavailable, "xdotool не найден: {}", e))?;

        // Код 1 без вывода означает "ничего не найдено"
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_window_list(&stdout).into_iter().next())
    }

    pub async fn get_active_window(&self) -> Result<Option<WindowHandle>> {
        let output = create_command("xdotool", &["getactivewindow"])
            .output()
            .map_err(|e| pagecap_error!(service_unavailable, "xdotool не найден: {}", e))?;

        if !output.status.success() {
            return Ok(None);
        }

        Ok(WindowHandle::parse(&String::from_utf8_lossy(&output.stdout)))
    }

    pub async fn describe(&self, handle: WindowHandle) -> Result<WindowInfo> {
        let id = handle.to_string();
        let name = run_checked("xdotool", &["getwindowname", &id])?;
        let title = String::from_utf8_lossy(&name.stdout).trim().to_string();

        let class = create_command("xdotool", &["getwindowclassname", &id])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
            .unwrap_or_default();

        Ok(WindowInfo::new(handle, title).with_class(class))
    }

    pub async fn exists(&self, handle: WindowHandle) -> Result<bool> {
        let output = create_command("xdotool", &["getwindowname", &handle.to_string()])
            .output()
            .map_err(|e| pagecap_error!(service_unavailable, "xdotool не найден: {}", e))?;
        Ok(output.status.success())
    }

    /// Без оконного менеджера с EWMH растягиваем окно вручную
    pub async fn maximize(&self, handle: WindowHandle) -> Result<()> {
        let id = handle.to_string();
        run_checked("xdotool", &["windowmove", &id, "0", "0"])?;
        run_checked("xdotool", &["windowsize", &id, "100%", "100%"])?;
        Ok(())
    }

    pub async fn activate(&self, handle: WindowHandle) -> Result<()> {
        run_checked("xdotool", &["windowactivate", "--sync", &handle.to_string()])?;
        Ok(())
    }

    pub async fn close(&self, handle: WindowHandle) -> Result<()> {
        run_checked("xdotool", &["windowclose", &handle.to_string()])?;
        Ok(())
    }
}

/// Вывод `xdotool search`: по одному десятичному идентификатору в строке
fn parse_window_list(stdout: &str) -> Vec<WindowHandle> {
    stdout.lines().filter_map(WindowHandle::parse).collect()
}
