use crate::config::{Config, MAX_PAGES_CEILING};
use crate::debug_if_enabled;
use crate::error::{PagecapError, Result};
use crate::model::{DocumentKind, Fingerprint, WindowHandle};
use crate::services::capture::CaptureProvider;
use crate::services::document_host::{DocumentHost, OpenDocument};
use crate::services::fingerprint::Fingerprinter;
use crate::services::virtual_device::KeySender;
use crate::services::window_manager::WindowManager;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::artifacts::PageArtifactStore;
use super::drivers::{build_driver, AdvanceContext, AdvanceOutcome, DriverTools, PageDriver};
use super::pacer::Pacer;
use super::stabilizer::Stabilizer;

/// Один запрос на конвертацию документа
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub document: PathBuf,
    pub output_root: PathBuf,
    /// `None` - определить по расширению
    pub kind: Option<DocumentKind>,
}

/// Почему цикл захвата остановился. Все варианты - успешное завершение.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Снимок совпал с предыдущим, дубликат удалён
    Duplicate,
    EndOfDocument,
    AdvanceFailed(String),
    /// Снимок не удался, сохранённые страницы остаются
    CaptureFailed(String),
    /// Достигнут предел `max_pages`
    BoundExceeded,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Duplicate => f.write_str("повтор страницы"),
            Termination::EndOfDocument => f.write_str("конец документа"),
            Termination::AdvanceFailed(reason) => write!(f, "переход не удался ({})", reason),
            Termination::CaptureFailed(reason) => write!(f, "снимок не удался ({})", reason),
            Termination::BoundExceeded => f.write_str("достигнут предел страниц"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    pub pages_captured: usize,
    pub output_directory: PathBuf,
    pub termination: Termination,
}

impl fmt::Display for CaptureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} стр. в {} ({})",
            self.pages_captured,
            self.output_directory.display(),
            self.termination
        )
    }
}

/// Состояние одного прогона; живёт только внутри `run`
struct SessionState {
    window: WindowHandle,
    page_counter: usize,
    previous: Option<Fingerprint>,
    max_pages: usize,
}

/// Цикл захвата: стабилизация, снимок, сохранение, отпечаток, сравнение, переход.
///
/// Один документ за раз; все шаги строго последовательны.
pub struct CaptureSession {
    config: Arc<Config>,
    host: Arc<dyn DocumentHost>,
    windows: Arc<dyn WindowManager>,
    capture: Arc<dyn CaptureProvider>,
    keys: Arc<dyn KeySender>,
    fingerprinter: Arc<dyn Fingerprinter>,
    pacer: Pacer,
}

impl CaptureSession {
    pub fn new(
        config: Arc<Config>,
        host: Arc<dyn DocumentHost>,
        windows: Arc<dyn WindowManager>,
        capture: Arc<dyn CaptureProvider>,
        keys: Arc<dyn KeySender>,
        fingerprinter: Arc<dyn Fingerprinter>,
    ) -> Self {
        let pacer = Pacer::from_config(&config);
        Self {
            config,
            host,
            windows,
            capture,
            keys,
            fingerprinter,
            pacer,
        }
    }

    pub async fn run(&self, request: &CaptureRequest) -> Result<CaptureSummary> {
        let kind = match request.kind {
            Some(kind) => kind,
            None => DocumentKind::detect(&request.document)?,
        };

        info!("Начало сессии: {} ({})", request.document.display(), kind);

        let mut document = self.host.open(&request.document, kind).await?;

        let result = self.drive(document.as_mut(), request, kind).await;

        // Документ закрывается на любом пути выхода, ошибка закрытия только логируется
        if let Err(e) = document.close().await {
            warn!("Не удалось закрыть документ {}: {}", request.document.display(), e);
        }

        match &result {
            Ok(summary) => info!("Сессия завершена: {}", summary),
            Err(e) if e.is_fatal() => error!("Сессия прервана: {}", e),
            Err(e) => warn!("Сессия завершена с ошибкой: {}", e),
        }

        result
    }

    async fn drive(
        &self,
        document: &mut dyn OpenDocument,
        request: &CaptureRequest,
        kind: DocumentKind,
    ) -> Result<CaptureSummary> {
        let window = self.locate_window(kind).await?;
        document.attach(window);

        let timing = self.config.timing_for(kind);
        let stabilizer = Stabilizer::new(self.windows.clone(), self.pacer, timing);

        // prepare шлёт клавиши в окно с фокусом, поэтому окно документа должно быть активным
        stabilizer.stabilize(window).await?;
        if let Err(e) = document.prepare().await {
            warn!("Подготовка документа не удалась, продолжаем: {}", e);
        }

        let store = PageArtifactStore::prepare(
            &request.output_root,
            &request.document,
            kind,
            &self.config.session.image_format,
        )?;

        let mut driver = build_driver(
            kind.driver_variant(),
            document.page_count(),
            DriverTools {
                windows: self.windows.clone(),
                keys: self.keys.clone(),
                pacer: self.pacer,
                timing,
                advance_chord: self.config.advance_chord()?,
                focus_attempts: self.config.input.focus_attempts,
            },
        );

        let mut state = SessionState {
            window,
            page_counter: 0,
            previous: None,
            max_pages: self.config.session.max_pages.min(MAX_PAGES_CEILING),
        };

        info!(
            "Захват: драйвер {:?}, страниц {}, предел {}",
            driver.variant(),
            driver
                .total_pages()
                .map_or_else(|| "неизвестно".to_string(), |n| n.to_string()),
            state.max_pages
        );

        let termination = self
            .capture_loop(&mut state, &stabilizer, driver.as_mut(), document, &store)
            .await?;

        Ok(CaptureSummary {
            pages_captured: state.page_counter,
            output_directory: store.directory().to_path_buf(),
            termination,
        })
    }

    async fn capture_loop(
        &self,
        state: &mut SessionState,
        stabilizer: &Stabilizer,
        driver: &mut dyn PageDriver,
        document: &mut dyn OpenDocument,
        store: &PageArtifactStore,
    ) -> Result<Termination> {
        for iteration in 1..=state.max_pages {
            stabilizer.stabilize(state.window).await?;

            let image = match self.capture.capture(state.window).await {
                Ok(image) => image,
                Err(e) => {
                    warn!("Снимок {} не удался, останавливаемся: {}", iteration, e);
                    return Ok(Termination::CaptureFailed(e.to_string()));
                }
            };

            let artifact = store.persist(state.page_counter + 1, &image)?;
            let fingerprint = self.fingerprinter.fingerprint(&artifact.path)?;
            debug_if_enabled!("Страница {}: {}", artifact.index, fingerprint.short());

            if state.previous.as_ref() == Some(&fingerprint) {
                info!("Страница {} повторяет предыдущую, конец документа", artifact.index);
                store.discard(&artifact)?;
                return Ok(Termination::Duplicate);
            }

            state.previous = Some(fingerprint);
            state.page_counter += 1;

            let mut ctx = AdvanceContext {
                page_counter: state.page_counter,
                window: state.window,
                document: &mut *document,
            };
            let outcome = driver.advance(&mut ctx).await;
            debug!("Переход после страницы {}: {}", state.page_counter, outcome);
            match outcome {
                AdvanceOutcome::Advanced => {}
                AdvanceOutcome::EndOfDocument => return Ok(Termination::EndOfDocument),
                AdvanceOutcome::Failed(reason) => return Ok(Termination::AdvanceFailed(reason)),
            }
        }

        warn!(
            "Достигнут предел в {} страниц, документ может быть длиннее",
            state.max_pages
        );
        Ok(Termination::BoundExceeded)
    }

    /// Ждать окно приложения по подсказкам классов; для PDF можно взять активное окно
    async fn locate_window(&self, kind: DocumentKind) -> Result<WindowHandle> {
        let hints = self.config.window_hints(kind);
        let windows = &self.windows;

        let found = self
            .pacer
            .poll(self.config.window_timeout(), move || async move {
                for hint in hints {
                    match windows.find_window(hint).await {
                        Ok(Some(handle)) => return Some(handle),
                        Ok(None) => {}
                        Err(e) => debug_if_enabled!("Поиск окна '{}': {}", hint, e),
                    }
                }
                None
            })
            .await;

        if let Some(handle) = found {
            return Ok(handle);
        }

        if self.config.fallback_to_active(kind) {
            if let Some(handle) = self.windows.active_window().await? {
                warn!("Окно по классу не найдено, используем активное окно #{}", handle);
                return Ok(handle);
            }
        }

        Err(PagecapError::WindowNotFound(format!(
            "для '{}' не найдено окно с классом из {:?} за {:?}",
            kind,
            hints,
            self.config.window_timeout()
        )))
    }
}

/// Все компоненты сессии из фабрик; в dry-run режиме они делят один `SimulatedScreen`
pub fn build_session(config: Arc<Config>, dry_run: bool) -> Result<CaptureSession> {
    use crate::services::capture::create_capture_provider;
    use crate::services::document_host::create_document_host;
    use crate::services::fingerprint::Sha256Fingerprinter;
    use crate::services::simulated_screen::SimulatedScreen;
    use crate::services::virtual_device::create_key_sender;
    use crate::services::window_manager::create_window_manager;

    let screen = SimulatedScreen::new(config.dry_run.simulated_pages);

    let windows = create_window_manager(dry_run)?;
    let keys = create_key_sender(&config, screen.clone(), dry_run)?;
    let capture = create_capture_provider(screen.clone(), dry_run)?;
    let host = create_document_host(config.clone(), windows.clone(), keys.clone(), screen, dry_run)?;

    Ok(CaptureSession::new(
        config,
        host,
        windows,
        capture,
        keys,
        Arc::new(Sha256Fingerprinter::new()),
    ))
}
