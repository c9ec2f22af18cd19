use crate::model::{DocumentKind, KeyChord};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Жёсткий потолок числа итераций сессии захвата
pub const MAX_PAGES_CEILING: usize = 500;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub session: SessionConfig,
    pub window: WindowConfig,
    pub timing: TimingConfig,
    pub input: InputConfig,
    pub host: HostConfig,
    pub merge: MergeConfig,
    pub dry_run: DryRunConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub max_pages: usize,
    pub image_format: String,
    pub window_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

/// Подстроки классов окон X11, по которым ищется окно приложения
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub slides: Vec<String>,
    pub sheets: Vec<String>,
    pub word: Vec<String>,
    pub pdf: Vec<String>,
    pub pdf_fallback_to_active: bool,
}

/// Паузы для одного типа документов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimingProfile {
    /// Пауза после максимизации и фокуса, перед захватом
    pub settle_ms: u64,
    /// Пауза после перехода на следующую страницу
    pub advance_delay_ms: u64,
    /// Пауза после повторного запроса фокуса
    pub focus_delay_ms: u64,
    /// Сколько ждать, пока окно станет активным
    pub focus_timeout_ms: u64,
}

impl TimingProfile {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn focus_timeout(&self) -> Duration {
        Duration::from_millis(self.focus_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    pub slides: TimingProfile,
    pub sheets: TimingProfile,
    pub word: TimingProfile,
    pub pdf: TimingProfile,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub advance_key: String,
    pub sheet_next_key: String,
    pub sheet_prev_key: String,
    /// Диалог "Перейти к странице" в текстовом процессоре
    pub word_goto_key: String,
    pub focus_attempts: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    pub office_command: String,
    pub viewer_command: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MergeConfig {
    pub dpi: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DryRunConfig {
    pub simulated_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            session: SessionConfig {
                max_pages: MAX_PAGES_CEILING,
                image_format: "png".to_string(),
                window_timeout_ms: 10_000,
                poll_interval_ms: 100,
            },
            window: WindowConfig {
                slides: vec!["libreoffice-impress".to_string(), "soffice".to_string()],
                sheets: vec!["libreoffice-calc".to_string(), "soffice".to_string()],
                word: vec!["libreoffice-writer".to_string(), "soffice".to_string()],
                pdf: vec![
                    "evince".to_string(),
                    "okular".to_string(),
                    "papers".to_string(),
                    "firefox".to_string(),
                ],
                pdf_fallback_to_active: true,
            },
            timing: TimingConfig {
                slides: TimingProfile {
                    settle_ms: 500,
                    advance_delay_ms: 500,
                    focus_delay_ms: 200,
                    focus_timeout_ms: 2_000,
                },
                sheets: TimingProfile {
                    settle_ms: 1_000,
                    advance_delay_ms: 500,
                    focus_delay_ms: 200,
                    focus_timeout_ms: 2_000,
                },
                word: TimingProfile {
                    settle_ms: 1_500,
                    advance_delay_ms: 2_000,
                    focus_delay_ms: 200,
                    focus_timeout_ms: 3_000,
                },
                pdf: TimingProfile {
                    settle_ms: 1_000,
                    advance_delay_ms: 2_000,
                    focus_delay_ms: 100,
                    focus_timeout_ms: 3_000,
                },
            },
            input: InputConfig {
                advance_key: "pagedown".to_string(),
                sheet_next_key: "ctrl+pagedown".to_string(),
                sheet_prev_key: "ctrl+pageup".to_string(),
                word_goto_key: "ctrl+g".to_string(),
                focus_attempts: 3,
            },
            host: HostConfig {
                office_command: "soffice".to_string(),
                viewer_command: "xdg-open".to_string(),
            },
            merge: MergeConfig { dpi: 96.0 },
            dry_run: DryRunConfig { simulated_pages: 5 },
        }
    }
}

impl Config {
    /// Значения по умолчанию, затем TOML файл (если есть), затем переменные `PAGECAP_*`
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("PAGECAP_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация сессии
        if self.session.max_pages == 0 || self.session.max_pages > MAX_PAGES_CEILING {
            anyhow::bail!(
                "max_pages должно быть в диапазоне 1..={}, получено {}",
                MAX_PAGES_CEILING,
                self.session.max_pages
            );
        }

        match self.session.image_format.as_str() {
            "png" | "jpg" => {}
            _ => anyhow::bail!("Неверный формат изображений: {}", self.session.image_format),
        }

        if self.session.poll_interval_ms < 10 {
            anyhow::bail!("poll_interval_ms должно быть минимум 10");
        }

        if self.session.window_timeout_ms < self.session.poll_interval_ms {
            anyhow::bail!("window_timeout_ms не может быть меньше poll_interval_ms");
        }

        // Валидация подсказок окон
        for kind in [
            DocumentKind::Slides,
            DocumentKind::Sheets,
            DocumentKind::Word,
            DocumentKind::Pdf,
        ] {
            if self.window_hints(kind).iter().any(|hint| hint.trim().is_empty()) {
                anyhow::bail!("Пустой класс окна в списке для '{}'", kind);
            }
            let timing = self.timing_for(kind);
            if timing.focus_timeout_ms == 0 {
                anyhow::bail!("focus_timeout_ms для '{}' должно быть больше 0", kind);
            }
        }

        if self.window.pdf.is_empty() && !self.window.pdf_fallback_to_active {
            anyhow::bail!("Для PDF не задано ни одного класса окна и отключён поиск активного окна");
        }

        // Валидация клавиш
        for (name, chord) in [
            ("advance_key", &self.input.advance_key),
            ("sheet_next_key", &self.input.sheet_next_key),
            ("sheet_prev_key", &self.input.sheet_prev_key),
            ("word_goto_key", &self.input.word_goto_key),
        ] {
            KeyChord::parse(chord).map_err(|e| anyhow::anyhow!("Неверная клавиша {}: {}", name, e))?;
        }

        if self.input.focus_attempts == 0 {
            anyhow::bail!("focus_attempts должно быть больше 0");
        }

        if self.host.office_command.trim().is_empty() || self.host.viewer_command.trim().is_empty() {
            anyhow::bail!("Команды запуска приложений не могут быть пустыми");
        }

        if !(self.merge.dpi > 0.0) {
            anyhow::bail!("merge.dpi должно быть положительным");
        }

        if self.dry_run.simulated_pages == 0 {
            anyhow::bail!("dry_run.simulated_pages должно быть больше 0");
        }

        Ok(())
    }

    pub fn timing_for(&self, kind: DocumentKind) -> TimingProfile {
        match kind {
            DocumentKind::Slides => self.timing.slides,
            DocumentKind::Sheets => self.timing.sheets,
            DocumentKind::Word => self.timing.word,
            DocumentKind::Pdf => self.timing.pdf,
        }
    }

    pub fn window_hints(&self, kind: DocumentKind) -> &[String] {
        match kind {
            DocumentKind::Slides => &self.window.slides,
            DocumentKind::Sheets => &self.window.sheets,
            DocumentKind::Word => &self.window.word,
            DocumentKind::Pdf => &self.window.pdf,
        }
    }

    /// Разрешено ли брать активное окно, если ни один класс не подошёл
    pub fn fallback_to_active(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::Pdf && self.window.pdf_fallback_to_active
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.session.poll_interval_ms)
    }

    pub fn window_timeout(&self) -> Duration {
        Duration::from_millis(self.session.window_timeout_ms)
    }

    /// Уже провалидировано в `validate`
    pub fn advance_chord(&self) -> Result<KeyChord> {
        KeyChord::parse(&self.input.advance_key).map_err(|e| anyhow::anyhow!(e))
    }
}
