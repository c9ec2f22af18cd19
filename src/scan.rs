//! Directory inventory: a folder tree written out as an indented spreadsheet,
//! one row per folder with its files listed in the cell to the right.

use crate::error::Result;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const FOLDER_MARK: &str = "📁 ";
const FILE_MARK: &str = "┣ ";
const FONT_SIZE: f64 = 9.0;
/// Высота строки на один файл в списке
const LINE_HEIGHT: f64 = 13.0;
const EMPTY_FILL: u32 = 0xBFBFBF;
/// Ограничение Excel на имя листа
const SHEET_NAME_LIMIT: usize = 31;

/// Папка на глубине `depth` от корня обхода и её файлы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRow {
    pub depth: usize,
    pub name: String,
    pub files: Vec<String>,
}

impl FolderRow {
    fn folder_cell(&self) -> String {
        format!("{}{}", FOLDER_MARK, self.name)
    }

    fn files_cell(&self) -> Option<String> {
        if self.files.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .files
            .iter()
            .map(|file| format!("{}{}", FILE_MARK, file))
            .collect();
        Some(lines.join("\n"))
    }

    /// Занятые столбцы: отступ, папка и список файлов, если он есть
    fn width(&self) -> usize {
        self.depth + 1 + usize::from(!self.files.is_empty())
    }
}

/// Обход сверху вниз: папка, затем её подпапки; записи отсортированы по имени
pub fn collect_rows(dir: &Path) -> Result<Vec<FolderRow>> {
    let mut rows = Vec::new();
    walk(dir, 0, &mut rows)?;
    Ok(rows)
}

fn walk(dir: &Path, depth: usize, rows: &mut Vec<FolderRow>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries {
        // Ссылки на каталоги не раскрываются
        if entry.file_type()?.is_dir() {
            subdirs.push(entry.path());
        } else {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    rows.push(FolderRow {
        depth,
        name: folder_name(dir),
        files,
    });

    for subdir in subdirs {
        walk(&subdir, depth + 1, rows)?;
    }
    Ok(())
}

fn folder_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Имя листа из имени файла таблицы, с заменой запрещённых символов
fn sheet_name(output: &Path) -> String {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cleaned: String = stem
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(SHEET_NAME_LIMIT)
        .collect();
    let cleaned = cleaned.trim_matches('\'');

    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}

fn display_width(text: &str) -> usize {
    text.lines().map(|line| line.chars().count()).max().unwrap_or(0)
}

/// Записать дерево каталога `dir` в `output` (.xlsx). Возвращает число папок.
pub fn scan_directory(dir: &Path, output: &Path) -> Result<usize> {
    let rows = collect_rows(dir)?;
    let columns = rows.iter().map(FolderRow::width).max().unwrap_or(1);
    debug!("{} папок, {} столбцов", rows.len(), columns);

    let plain = Format::new()
        .set_font_size(FONT_SIZE)
        .set_align(FormatAlign::Top);
    let wrapped = plain.clone().set_text_wrap();
    let empty = plain
        .clone()
        .set_background_color(Color::RGB(EMPTY_FILL))
        .set_pattern(FormatPattern::Solid);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name(output))?;

    let mut widths = vec![0usize; columns];
    for (index, row) in rows.iter().enumerate() {
        let line = index as u32;

        for (column, width) in widths.iter_mut().enumerate() {
            let cell = if column == row.depth {
                Some((row.folder_cell(), &plain))
            } else if column == row.depth + 1 {
                row.files_cell().map(|files| (files, &wrapped))
            } else {
                None
            };

            match cell {
                Some((text, format)) => {
                    *width = (*width).max(display_width(&text));
                    sheet.write_string_with_format(line, column as u16, text.as_str(), format)?;
                }
                None => {
                    sheet.write_blank(line, column as u16, &empty)?;
                }
            }
        }

        if !row.files.is_empty() {
            sheet.set_row_height(line, LINE_HEIGHT * row.files.len() as f64)?;
        }
    }

    for (column, width) in widths.iter().enumerate() {
        if *width > 0 {
            sheet.set_column_width(column as u16, (*width + 2) as f64)?;
        }
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    workbook.save(output)?;

    info!("Дерево {} записано в {}", dir.display(), output.display());
    Ok(rows.len())
}
