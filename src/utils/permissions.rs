use crate::config::Config;
use crate::error::{PagecapError, Result};
use crate::utils::command::find_in_path;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

/// Утилиты, без которых захват невозможен
const REQUIRED_TOOLS: &[&str] = &["xdotool", "import"];

/// Проверить доступ к /dev/uinput и наличие внешних утилит перед настоящим захватом
pub fn check_permissions(config: &Config) -> Result<()> {
    info!("Проверка прав доступа...");

    check_uinput_access(Path::new("/dev/uinput"))?;

    let missing = missing_tools(REQUIRED_TOOLS);
    if !missing.is_empty() {
        return Err(PagecapError::Permission(format!(
            "не найдены в PATH: {}. Установите пакеты xdotool и imagemagick",
            missing.join(", ")
        )));
    }

    // Без wmctrl окна разворачиваются вручную через xdotool
    if find_in_path("wmctrl").is_none() {
        warn!("wmctrl не найден, максимизация будет выполняться через xdotool");
    }

    let hosts = [
        config.host.office_command.as_str(),
        config.host.viewer_command.as_str(),
    ];
    for tool in missing_tools(&hosts) {
        warn!("{} не найден в PATH, документы этого типа открыть не получится", tool);
    }

    check_display();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn missing_tools<'a>(tools: &[&'a str]) -> Vec<&'a str> {
    tools
        .iter()
        .copied()
        .filter(|tool| find_in_path(tool).is_none())
        .collect()
}

fn check_uinput_access(uinput_device: &Path) -> Result<()> {
    if !uinput_device.exists() {
        return Err(PagecapError::Permission(format!(
            "{} не существует. Загрузите модуль: sudo modprobe uinput",
            uinput_device.display()
        )));
    }

    match fs::metadata(uinput_device) {
        Ok(metadata) => {
            let mode = metadata.permissions().mode();

            // Обычно 660 с группой input/uinput или 666
            if mode & 0o006 == 0 && mode & 0o060 == 0 {
                return Err(PagecapError::Permission(format!(
                    "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'",
                    uinput_device.display()
                )));
            }

            info!("Доступ к {} подтвержден", uinput_device.display());
            Ok(())
        }
        Err(e) => Err(PagecapError::Permission(format!(
            "Не удалось проверить права доступа к {}: {}",
            uinput_device.display(),
            e
        ))),
    }
}

fn check_display() {
    match std::env::var("DISPLAY") {
        Ok(display_name) => info!("Дисплей X11: {}", display_name),
        Err(_) if std::env::var_os("WAYLAND_DISPLAY").is_some() => {
            warn!("Сессия Wayland без DISPLAY: xdotool и import работают только через XWayland");
        }
        Err(_) => warn!("DISPLAY не задан, окна приложений не будут найдены"),
    }
}
