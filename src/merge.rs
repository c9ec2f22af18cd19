//! Merge a directory of page images into a single PDF, one page per image.

use crate::error::{PagecapError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Ключ сортировки: числовые имена по числу, остальные после них по строке
#[derive(Debug, Clone, PartialEq, Eq)]
enum SortKey {
    Number(u64),
    Text(String),
}

impl SortKey {
    /// `12.png` -> 12, `deck_page_003.png` -> 3 (хвостовые цифры), `cover.png` -> текст
    fn for_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let digits_start = stem
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i);

        match digits_start.and_then(|i| stem[i..].parse().ok()) {
            Some(number) => SortKey::Number(number),
            None => SortKey::Text(stem),
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Изображения каталога в порядке страниц
pub fn collect_images(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if is_image {
            images.push(path);
        }
    }

    images.sort_by(|a, b| {
        SortKey::for_path(a)
            .cmp(&SortKey::for_path(b))
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });
    Ok(images)
}

/// Собрать PDF из всех изображений каталога. Размер страницы равен размеру
/// изображения при заданном DPI.
pub fn merge_directory(directory: &Path, output: &Path, dpi: f32) -> Result<usize> {
    let images = collect_images(directory)?;
    if images.is_empty() {
        return Err(PagecapError::Merge(format!(
            "в {} нет изображений ({})",
            directory.display(),
            IMAGE_EXTENSIONS.join(", ")
        )));
    }

    info!("Сборка PDF из {} изображений в {}", images.len(), output.display());

    let title = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pagecap".to_string());
    let mut doc = PdfDocument::new(&title);
    let mut pages = Vec::with_capacity(images.len());

    for path in &images {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: None,
                scale_y: None,
                dpi: Some(dpi),
                rotate: None,
            },
        }];

        pages.push(PdfPage::new(pixels_to_mm(width, dpi), pixels_to_mm(height, dpi), ops));
        debug!("{}: {}x{}", path.display(), width, height);
    }

    let page_count = pages.len();
    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        warn!("printpdf: {} предупреждений при сохранении", warnings.len());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, bytes)?;

    info!("PDF сохранён: {} ({} стр.)", output.display(), page_count);
    Ok(page_count)
}

fn pixels_to_mm(pixels: u32, dpi: f32) -> Mm {
    Mm(pixels as f32 / dpi * 25.4)
}
