use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
mod config;
mod error;
mod merge;
mod model;
mod scan;
mod services;
mod session;
mod utils;

use config::Config;
use model::DocumentKind;
use session::{build_session, CaptureRequest, Termination};

#[derive(Parser, Debug)]
#[command(name = "pagecap")]
#[command(about = "Постраничный захват документов в изображения через окно их родного приложения")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "pagecap.toml", global = true)]
    config: String,

    /// Режим сухого запуска (без реальных окон и нажатий)
    #[arg(long, global = true)]
    dry_run: bool,

    /// Уровень логирования (перекрывает значение из конфигурации)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Открыть документ и сохранить каждую страницу как изображение
    Capture {
        /// Документ: ppt/pptx/odp, xls/xlsx/ods, doc/docx/odt/rtf или pdf
        file: PathBuf,

        /// Каталог, в котором будет создан каталог страниц
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Тип документа, если расширение ему не соответствует
        #[arg(short, long, value_enum)]
        kind: Option<DocumentKind>,
    },

    /// Собрать изображения каталога в один PDF
    Merge {
        /// Каталог с изображениями страниц
        dir: PathBuf,

        /// Итоговый PDF
        output: PathBuf,
    },

    /// Записать дерево каталога в таблицу xlsx
    Scan {
        /// Сканируемый каталог
        dir: PathBuf,

        /// Итоговая таблица
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Конфигурация нужна до логирования: из неё берутся уровень и формат
    let config = Arc::new(
        Config::load(&args.config)
            .with_context(|| format!("Конфигурация {} не загружена", args.config))?,
    );

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск pagecap v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    match args.command {
        Command::Capture { file, output, kind } => {
            run_capture(config, args.dry_run, file, output, kind).await
        }
        Command::Merge { dir, output } => {
            let pages = merge::merge_directory(&dir, &output, config.merge.dpi)
                .with_context(|| format!("Не удалось собрать PDF из {}", dir.display()))?;
            println!("{} ({} стр.)", output.display(), pages);
            Ok(())
        }
        Command::Scan { dir, output } => {
            let folders = scan::scan_directory(&dir, &output)
                .with_context(|| format!("Не удалось просканировать {}", dir.display()))?;
            println!("{} ({} папок)", output.display(), folders);
            Ok(())
        }
    }
}

async fn run_capture(
    config: Arc<Config>,
    dry_run: bool,
    file: PathBuf,
    output: Option<PathBuf>,
    kind: Option<DocumentKind>,
) -> Result<()> {
    if dry_run {
        warn!("Режим сухого запуска - окна, нажатия и приложения эмулируются");
    } else {
        utils::permissions::check_permissions(&config)?;
    }

    let output_root = match output {
        Some(dir) => dir,
        None => file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let session = build_session(config, dry_run)?;
    info!("Все компоненты инициализированы");

    let request = CaptureRequest {
        document: file,
        output_root,
        kind,
    };
    let summary = session
        .run(&request)
        .await
        .with_context(|| format!("Захват {} прерван", request.document.display()))?;

    if let Termination::BoundExceeded = summary.termination {
        warn!("Документ мог быть захвачен не полностью");
    }

    println!("{}", summary);
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "full" => registry.with(tracing_subscriber::fmt::layer()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }

    Ok(())
}
