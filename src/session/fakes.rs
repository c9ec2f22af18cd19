//! Scripted collaborators for session tests.

use crate::error::{PagecapError, Result};
use crate::model::{DocumentKind, KeyChord, WindowHandle};
use crate::services::capture::CaptureProvider;
use crate::services::document_host::{DocumentHost, OpenDocument};
use crate::services::virtual_device::KeySender;
use crate::services::window_manager::WindowManager;
use image::{DynamicImage, Rgba, RgbaImage};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Однотонный кадр; одинаковые `shade` дают одинаковые файлы
pub fn frame(shade: u8) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([shade, 64, 255 - shade, 255])))
}

#[derive(Default)]
pub struct FakeWindows {
    present: bool,
    closed: AtomicBool,
    never_active: bool,
    fail_maximize: bool,
    fail_focus: bool,
    active_fallback: bool,
    /// Номер запроса активного окна (с 1), на который окно не в фокусе
    inactive_query: Option<usize>,
    maximize_calls: AtomicUsize,
    focus_calls: AtomicUsize,
    active_queries: AtomicUsize,
}

impl FakeWindows {
    pub const HANDLE: WindowHandle = WindowHandle(0x3a00007);

    pub fn present() -> Self {
        Self {
            present: true,
            ..Self::default()
        }
    }

    /// Ни один класс не подходит
    pub fn absent() -> Self {
        Self::default()
    }

    /// Поиск по классу ничего не даёт, но окно активно
    pub fn only_active() -> Self {
        Self {
            active_fallback: true,
            ..Self::default()
        }
    }

    pub fn never_active(mut self) -> Self {
        self.never_active = true;
        self
    }

    /// Фокус пропадает на один опрос и возвращается
    pub fn inactive_on_query(mut self, query: usize) -> Self {
        self.inactive_query = Some(query);
        self
    }

    pub fn failing_maximize(mut self) -> Self {
        self.fail_maximize = true;
        self
    }

    pub fn failing_focus(mut self) -> Self {
        self.fail_focus = true;
        self
    }

    pub fn maximize_calls(&self) -> usize {
        self.maximize_calls.load(Ordering::SeqCst)
    }

    pub fn focus_calls(&self) -> usize {
        self.focus_calls.load(Ordering::SeqCst)
    }

    pub fn active_queries(&self) -> usize {
        self.active_queries.load(Ordering::SeqCst)
    }

    fn alive(&self) -> bool {
        (self.present || self.active_fallback) && !self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl WindowManager for FakeWindows {
    async fn find_window(&self, _class_hint: &str) -> Result<Option<WindowHandle>> {
        Ok((self.present && self.alive()).then_some(Self::HANDLE))
    }

    async fn active_window(&self) -> Result<Option<WindowHandle>> {
        let query = self.active_queries.fetch_add(1, Ordering::SeqCst) + 1;
        if self.inactive_query == Some(query) {
            return Ok(None);
        }
        Ok((self.alive() && !self.never_active).then_some(Self::HANDLE))
    }

    async fn exists(&self, handle: WindowHandle) -> Result<bool> {
        Ok(handle == Self::HANDLE && self.alive())
    }

    async fn maximize(&self, _handle: WindowHandle) -> Result<()> {
        self.maximize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_maximize {
            return Err(PagecapError::Internal("wmctrl exited with 1".to_string()));
        }
        Ok(())
    }

    async fn focus(&self, _handle: WindowHandle) -> Result<()> {
        self.focus_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_focus {
            return Err(PagecapError::Internal("windowactivate failed".to_string()));
        }
        Ok(())
    }

    async fn close(&self, _handle: WindowHandle) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Запоминает все нажатия
#[derive(Default)]
pub struct FakeKeys {
    taps: Mutex<Vec<KeyChord>>,
    fail: bool,
}

impl FakeKeys {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn tap_count(&self) -> usize {
        self.taps.lock().len()
    }

    pub fn taps(&self) -> Vec<KeyChord> {
        self.taps.lock().clone()
    }
}

impl KeySender for FakeKeys {
    fn tap(&self, chord: &KeyChord) -> Result<()> {
        if self.fail {
            return Err(PagecapError::Internal("uinput write failed".to_string()));
        }
        self.taps.lock().push(chord.clone());
        Ok(())
    }
}

/// Что происходило с документом, видно и после того, как сессия его закрыла
#[derive(Default)]
pub struct DocumentLog {
    pub selected: Mutex<Vec<usize>>,
    pub next_calls: AtomicUsize,
    pub prepared: AtomicBool,
    /// Сколько раз окно получало фокус к моменту `prepare`
    pub focus_at_prepare: Mutex<Option<usize>>,
    pub attached: Mutex<Option<WindowHandle>>,
    pub closed: AtomicUsize,
}

impl DocumentLog {
    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

pub struct FakeHost {
    page_count: Option<usize>,
    /// `next_page` начинает падать после стольких успешных вызовов
    stream_pages: Option<usize>,
    fail_open: bool,
    fail_prepare: bool,
    windows: Option<Arc<FakeWindows>>,
    pub log: Arc<DocumentLog>,
}

impl FakeHost {
    pub fn indexed(page_count: usize) -> Self {
        Self::with(Some(page_count), None)
    }

    pub fn stream() -> Self {
        Self::with(None, None)
    }

    pub fn stream_ending_after(successful_moves: usize) -> Self {
        Self::with(None, Some(successful_moves))
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::stream()
        }
    }

    pub fn failing_prepare(mut self) -> Self {
        self.fail_prepare = true;
        self
    }

    /// Документ запоминает состояние фокуса окна в момент `prepare`
    pub fn watching(mut self, windows: Arc<FakeWindows>) -> Self {
        self.windows = Some(windows);
        self
    }

    fn with(page_count: Option<usize>, stream_pages: Option<usize>) -> Self {
        Self {
            page_count,
            stream_pages,
            fail_open: false,
            fail_prepare: false,
            windows: None,
            log: Arc::new(DocumentLog::default()),
        }
    }
}

#[async_trait::async_trait]
impl DocumentHost for FakeHost {
    async fn open(&self, path: &Path, _kind: DocumentKind) -> Result<Box<dyn OpenDocument>> {
        if self.fail_open {
            return Err(PagecapError::DocumentOpen(format!("{} повреждён", path.display())));
        }
        Ok(Box::new(FakeDocument {
            page_count: self.page_count,
            stream_pages: self.stream_pages,
            fail_prepare: self.fail_prepare,
            windows: self.windows.clone(),
            log: self.log.clone(),
        }))
    }
}

pub struct FakeDocument {
    page_count: Option<usize>,
    stream_pages: Option<usize>,
    fail_prepare: bool,
    windows: Option<Arc<FakeWindows>>,
    log: Arc<DocumentLog>,
}

#[async_trait::async_trait]
impl OpenDocument for FakeDocument {
    fn page_count(&self) -> Option<usize> {
        self.page_count
    }

    fn attach(&mut self, window: WindowHandle) {
        *self.log.attached.lock() = Some(window);
    }

    async fn prepare(&mut self) -> Result<()> {
        self.log.prepared.store(true, Ordering::SeqCst);
        if let Some(windows) = &self.windows {
            *self.log.focus_at_prepare.lock() = Some(windows.focus_calls());
        }
        if self.fail_prepare {
            return Err(PagecapError::Internal("ctrl+home не дошёл".to_string()));
        }
        Ok(())
    }

    async fn select(&mut self, index: usize) -> Result<()> {
        if self.page_count.is_some_and(|total| index > total) {
            return Err(PagecapError::Advance(format!("нет страницы {}", index)));
        }
        self.log.selected.lock().push(index);
        Ok(())
    }

    async fn next_page(&mut self) -> Result<()> {
        let done = self.log.next_calls.fetch_add(1, Ordering::SeqCst);
        match self.stream_pages {
            Some(limit) if done >= limit => Err(PagecapError::Advance("GoTo вернул ошибку".to_string())),
            _ => Ok(()),
        }
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

type Script = Box<dyn Fn(usize) -> Result<DynamicImage> + Send + Sync>;

/// Снимок номер `n` (с 1) берётся из скрипта
pub struct ScriptedCapture {
    calls: AtomicUsize,
    script: Script,
}

impl ScriptedCapture {
    pub fn new(script: impl Fn(usize) -> Result<DynamicImage> + Send + Sync + 'static) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: Box::new(script),
        }
    }

    /// Каждый снимок отличается от предыдущего
    pub fn distinct() -> Self {
        Self::new(|n| Ok(frame(n as u8)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CaptureProvider for ScriptedCapture {
    async fn capture(&self, _handle: WindowHandle) -> Result<DynamicImage> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        (self.script)(n)
    }
}
