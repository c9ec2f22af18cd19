use crate::error::{PagecapError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::debug;

/// Переменные окружения, без которых X11 утилиты не видят дисплей пользователя под sudo
fn build_env_overrides() -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if std::env::var("USER").unwrap_or_default() == "root" {
        if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            if let Ok(output) = Command::new("id").args(["-u", &sudo_user]).output() {
                if let Ok(uid_str) = String::from_utf8(output.stdout) {
                    let uid = uid_str.trim();
                    let user_runtime_dir = format!("/run/user/{}", uid);

                    debug!("Подставляем переменные окружения для пользователя {}: uid={}", sudo_user, uid);
                    env_vars.insert(
                        "DBUS_SESSION_BUS_ADDRESS".to_string(),
                        format!("unix:path={}/bus", user_runtime_dir),
                    );
                    env_vars.insert("XDG_RUNTIME_DIR".to_string(), user_runtime_dir);
                    env_vars.insert("USER".to_string(), sudo_user);
                }
            }
        }
    }

    for key in ["DISPLAY", "XAUTHORITY"] {
        if let Ok(value) = std::env::var(key) {
            env_vars.insert(key.to_string(), value);
        }
    }

    env_vars
}

/// Команда, запускаемая от имени пользователя сессии (через `sudo -E -u`, если мы под sudo)
pub fn create_command(program: &str, args: &[&str]) -> Command {
    let mut cmd = if let Ok(sudo_user) = std::env::var("SUDO_USER") {
        let mut cmd = Command::new("sudo");
        cmd.args(["-E", "-u", &sudo_user, program]);
        cmd.args(args);
        cmd
    } else {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    };

    for (key, value) in build_env_overrides() {
        cmd.env(key, value);
    }

    cmd
}

/// Запустить и дождаться завершения; ненулевой код выхода превращается в ошибку
pub fn run_checked(program: &str, args: &[&str]) -> Result<Output> {
    let output = create_command(program, args).output().map_err(|e| {
        PagecapError::ServiceUnavailable(format!("{} не найден: {}", program, e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{} {:?} вернул ошибку: {}", program, args, stderr.trim());
        return Err(PagecapError::Internal(format!(
            "{} {} завершился с кодом {:?}: {}",
            program,
            args.join(" "),
            output.status.code(),
            stderr.trim()
        )));
    }

    Ok(output)
}

/// Найти исполняемый файл в PATH
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_path_locates_shell() {
        assert!(find_in_path("sh").is_some());
        assert!(find_in_path("definitely-not-a-real-binary-xyz").is_none());
    }
}
