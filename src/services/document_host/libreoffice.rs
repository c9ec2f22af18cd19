use crate::config::Config;
use crate::error::{PagecapError, Result};
use crate::pagecap_error;
use crate::model::{DocumentKind, KeyChord, WindowHandle};
use crate::services::keycode_map::KeycodeMap;
use crate::services::virtual_device::KeySender;
use crate::services::window_manager::WindowManager;
use crate::session::Pacer;
use crate::utils::command::create_command;
use std::path::Path;
use std::process::{Child, Stdio};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use super::page_count::count_pages;
use super::r#trait::{DocumentHost, OpenDocument};

/// Сколько ждать завершения soffice после запроса на закрытие окна
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Диалог перехода к странице должен получить фокус раньше, чем номер
const DIALOG_DELAY: Duration = Duration::from_millis(300);

/// Горячие клавиши навигации LibreOffice
#[derive(Debug, Clone)]
struct Navigation {
    sheet_next: KeyChord,
    sheet_prev: KeyChord,
    goto_page: KeyChord,
    document_start: KeyChord,
    enter: KeyChord,
}

impl Navigation {
    fn from_config(config: &Config) -> Result<Self> {
        let parse = |spec: &str| {
            KeyChord::parse(spec).map_err(|e| PagecapError::Internal(format!("Клавиша '{}': {}", spec, e)))
        };
        Ok(Self {
            sheet_next: parse(&config.input.sheet_next_key)?,
            sheet_prev: parse(&config.input.sheet_prev_key)?,
            goto_page: parse(&config.input.word_goto_key)?,
            document_start: parse("ctrl+home")?,
            enter: parse("enter")?,
        })
    }

    /// Номер страницы цифрами, затем Enter: для показа слайдов и диалога перехода
    fn typed_number(&self, index: usize) -> Result<Vec<KeyChord>> {
        let mut chords = Vec::new();
        for digit in KeycodeMap::digits_of(index) {
            chords.push(
                KeyChord::parse(digit).map_err(PagecapError::Internal)?,
            );
        }
        chords.push(self.enter.clone());
        Ok(chords)
    }
}

/// Презентации, таблицы и текстовые документы в LibreOffice (`soffice`)
pub struct LibreOfficeHost {
    office_command: String,
    windows: Arc<dyn WindowManager>,
    keys: Arc<dyn KeySender>,
    navigation: Navigation,
    pacer: Pacer,
}

impl LibreOfficeHost {
    pub fn new(
        config: Arc<Config>,
        windows: Arc<dyn WindowManager>,
        keys: Arc<dyn KeySender>,
    ) -> Result<Self> {
        Ok(Self {
            office_command: config.host.office_command.clone(),
            windows,
            keys,
            navigation: Navigation::from_config(&config)?,
            pacer: Pacer::from_config(&config),
        })
    }
}

#[async_trait::async_trait]
impl DocumentHost for LibreOfficeHost {
    async fn open(&self, path: &Path, kind: DocumentKind) -> Result<Box<dyn OpenDocument>> {
        if !path.is_file() {
            return Err(pagecap_error!(document_open, "файл {} не найден", path.display()));
        }

        let page_count = match count_pages(path, kind) {
            Ok(count) => count,
            Err(e) => {
                warn!("Не удалось определить количество страниц {}: {}", path.display(), e);
                None
            }
        };

        let path_arg = path.to_string_lossy();
        let mut args = vec!["--nologo", "--norestore"];
        if kind == DocumentKind::Slides {
            // Показ слайдов сразу открывается на первом слайде во весь экран
            args.push("--show");
        }
        args.push(path_arg.as_ref());

        info!("Запуск {} {:?}", self.office_command, args);
        let child = create_command(&self.office_command, &args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| pagecap_error!(document_open, "не удалось запустить {}: {}", self.office_command, e))?;

        Ok(Box::new(LibreOfficeDocument {
            kind,
            child: Some(child),
            window: None,
            current: 1,
            page_count,
            windows: self.windows.clone(),
            keys: self.keys.clone(),
            navigation: self.navigation.clone(),
            pacer: self.pacer,
        }))
    }
}

pub struct LibreOfficeDocument {
    kind: DocumentKind,
    child: Option<Child>,
    window: Option<WindowHandle>,
    current: usize,
    page_count: Option<usize>,
    windows: Arc<dyn WindowManager>,
    keys: Arc<dyn KeySender>,
    navigation: Navigation,
    pacer: Pacer,
}

impl LibreOfficeDocument {
    fn repeat(&self, chord: &KeyChord, times: usize) -> Result<()> {
        for _ in 0..times {
            self.keys.tap(chord)?;
        }
        Ok(())
    }

    async fn wait_for_exit(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };

        let exited = self
            .pacer
            .poll(EXIT_GRACE, || {
                let state = match child.try_wait() {
                    Ok(Some(status)) => Some(Some(status)),
                    Ok(None) => None,
                    Err(e) => {
                        warn!("Не удалось проверить состояние soffice: {}", e);
                        Some(None)
                    }
                };
                async move { state }
            })
            .await;

        match exited {
            Some(Some(status)) => {
                debug!("soffice завершился: {}", status);
                self.child = None;
            }
            _ => self.kill_child(),
        }
    }

    fn kill_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            warn!("soffice (pid {}) не завершился сам, принудительное завершение", child.id());
            if let Err(e) = child.kill() {
                debug!("kill soffice: {}", e);
            }
            let _ = child.wait();
        }
    }
}

#[async_trait::async_trait]
impl OpenDocument for LibreOfficeDocument {
    fn page_count(&self) -> Option<usize> {
        self.page_count
    }

    fn attach(&mut self, window: WindowHandle) {
        self.window = Some(window);
    }

    async fn prepare(&mut self) -> Result<()> {
        match self.kind {
            DocumentKind::Sheets => {
                // Книга открывается на последнем активном листе, отматываем к первому
                let rewind = self.page_count.unwrap_or(64).saturating_sub(1);
                self.repeat(&self.navigation.sheet_prev, rewind)?;
            }
            DocumentKind::Word => {
                self.keys.tap(&self.navigation.document_start)?;
            }
            DocumentKind::Slides | DocumentKind::Pdf => {}
        }
        self.current = 1;
        Ok(())
    }

    async fn select(&mut self, index: usize) -> Result<()> {
        if index == 0 || self.page_count.is_some_and(|total| index > total) {
            return Err(pagecap_error!(
                advance,
                "страница {} вне диапазона 1..={:?}",
                index,
                self.page_count
            ));
        }

        match self.kind {
            DocumentKind::Slides => {
                let chords = self.navigation.typed_number(index)?;
                self.keys.tap_sequence(&chords)?;
            }
            DocumentKind::Sheets => {
                if index >= self.current {
                    self.repeat(&self.navigation.sheet_next, index - self.current)?;
                } else {
                    self.repeat(&self.navigation.sheet_prev, self.current - index)?;
                }
            }
            DocumentKind::Word => {
                // PageDown листает экран, а не страницу; переход идёт через диалог
                self.keys.tap(&self.navigation.goto_page)?;
                self.pacer.pause(DIALOG_DELAY).await;
                let chords = self.navigation.typed_number(index)?;
                self.keys.tap_sequence(&chords)?;
            }
            DocumentKind::Pdf => {
                return Err(pagecap_error!(
                    internal,
                    "выбор страницы по номеру не поддерживается для '{}'",
                    self.kind
                ));
            }
        }

        self.current = index;
        Ok(())
    }

    async fn next_page(&mut self) -> Result<()> {
        self.select(self.current + 1).await
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        info!("Закрытие документа ({})", self.kind);

        if let Some(window) = self.window {
            if let Err(e) = self.windows.close(window).await {
                warn!("Не удалось закрыть окно #{}: {}", window, e);
            }
        }

        self.wait_for_exit().await;
        Ok(())
    }
}

impl Drop for LibreOfficeDocument {
    fn drop(&mut self) {
        self.kill_child();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fakes::{FakeKeys, FakeWindows};
    use tokio::time::Instant;

    fn chord(text: &str) -> KeyChord {
        KeyChord::parse(text).unwrap()
    }

    fn document(kind: DocumentKind, page_count: Option<usize>, keys: Arc<FakeKeys>) -> LibreOfficeDocument {
        let config = Config::default();
        LibreOfficeDocument {
            kind,
            child: None,
            window: Some(FakeWindows::HANDLE),
            current: 1,
            page_count,
            windows: Arc::new(FakeWindows::present()),
            keys,
            navigation: Navigation::from_config(&config).unwrap(),
            pacer: Pacer::from_config(&config),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_word_pages_through_goto_dialog() {
        let keys = Arc::new(FakeKeys::default());
        let mut doc = document(DocumentKind::Word, None, keys.clone());

        doc.prepare().await.unwrap();
        doc.next_page().await.unwrap();
        doc.next_page().await.unwrap();

        assert_eq!(
            keys.taps(),
            vec![
                chord("ctrl+home"),
                chord("ctrl+g"),
                chord("2"),
                chord("enter"),
                chord("ctrl+g"),
                chord("3"),
                chord("enter"),
            ]
        );
        assert!(!keys.taps().contains(&chord("pagedown")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_word_waits_for_dialog_before_typing() {
        let keys = Arc::new(FakeKeys::default());
        let mut doc = document(DocumentKind::Word, None, keys);
        let start = Instant::now();

        doc.select(12).await.unwrap();

        assert!(start.elapsed() >= DIALOG_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sheets_rewind_then_move_by_delta() {
        let keys = Arc::new(FakeKeys::default());
        let mut doc = document(DocumentKind::Sheets, Some(4), keys.clone());

        doc.prepare().await.unwrap();
        assert_eq!(keys.taps(), vec![chord("ctrl+pageup"); 3]);

        doc.select(3).await.unwrap();
        doc.select(2).await.unwrap();
        assert_eq!(
            keys.taps()[3..].to_vec(),
            vec![chord("ctrl+pagedown"), chord("ctrl+pagedown"), chord("ctrl+pageup")]
        );

        let err = doc.select(5).await.unwrap_err();
        assert!(matches!(err, PagecapError::Advance(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slide_number_is_typed() {
        let keys = Arc::new(FakeKeys::default());
        let mut doc = document(DocumentKind::Slides, Some(20), keys.clone());

        doc.select(12).await.unwrap();

        assert_eq!(keys.taps(), vec![chord("1"), chord("2"), chord("enter")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_office_is_killed_after_paced_grace() {
        let mut doc = document(DocumentKind::Word, None, Arc::new(FakeKeys::default()));
        doc.child = Some(std::process::Command::new("sleep").arg("30").spawn().unwrap());
        let start = Instant::now();

        doc.wait_for_exit().await;

        assert!(doc.child.is_none());
        assert!(start.elapsed() >= EXIT_GRACE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_closes_attached_window() {
        let windows = Arc::new(FakeWindows::present());
        let mut doc = document(DocumentKind::Word, None, Arc::new(FakeKeys::default()));
        doc.windows = windows.clone() as Arc<dyn WindowManager>;

        Box::new(doc).close().await.unwrap();

        assert!(!windows.exists(FakeWindows::HANDLE).await.unwrap());
    }
}
