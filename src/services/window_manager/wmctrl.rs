use crate::error::{PagecapError, Result};
use crate::model::WindowHandle;
use crate::utils::command::{create_command, run_checked};

pub struct WmctrlManager;

impl WmctrlManager {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = create_command("wmctrl", &["-m"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(PagecapError::Internal("wmctrl failed".to_string()))
        }
    }

    /// Штатная максимизация через EWMH, окно остаётся "развёрнутым" для WM
    pub async fn maximize(&self, handle: WindowHandle) -> Result<()> {
        let id = handle.to_hex();
        run_checked("wmctrl", &["-i", "-r", &id, "-b", "remove,hidden"])?;
        run_checked("wmctrl", &["-i", "-r", &id, "-b", "add,maximized_vert,maximized_horz"])?;
        Ok(())
    }

    pub async fn close(&self, handle: WindowHandle) -> Result<()> {
        run_checked("wmctrl", &["-i", "-c", &handle.to_hex()])?;
        Ok(())
    }

    /// Поиск окна по подстроке класса в выводе `wmctrl -lx`
    pub async fn find_by_class(&self, class_hint: &str) -> Result<Option<WindowHandle>> {
        let output = run_checked("wmctrl", &["-lx"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(find_in_listing(&stdout, class_hint))
    }
}

/// Строки `wmctrl -lx`: `0x03c00006  0 soffice.libreoffice-impress  host  title`
fn find_in_listing(listing: &str, class_hint: &str) -> Option<WindowHandle> {
    let hint = class_hint.to_lowercase();
    listing.lines().find_map(|line| {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return None;
        }
        if parts[2].to_lowercase().contains(&hint) {
            WindowHandle::parse(parts[0])
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_listing() {
        let listing = "\
0x01e00003  0 gnome-terminal-server.Gnome-terminal  host  Terminal
0x03c00006  0 soffice.libreoffice-impress  host  deck.pptx - LibreOffice Impress
";
        assert_eq!(
            find_in_listing(listing, "LibreOffice-Impress"),
            Some(WindowHandle(0x03c00006))
        );
        assert_eq!(find_in_listing(listing, "evince"), None);
        assert_eq!(find_in_listing("", "soffice"), None);
    }
}
