//! # Thumbnail Batch Processor
//!
//! Orchestratore principale: risolve le cartelle, trova i candidati, delega
//! la conversione dei singoli file a `ThumbnailTask` e raccoglie i risultati.
//!
//! ## Flusso:
//! 1. Valida la configurazione (nessun side effect in caso di errore)
//! 2. Risolve cartella di input e di output una sola volta
//! 3. Trova i `*.png` non ancora convertiti (filtro sul suffisso)
//! 4. Converte i candidati, saltando quelli con output già presente
//! 5. Ritorna un `BatchReport` con i path creati in ordine di candidato
//!
//! ## Errori per file:
//! - Default: il primo errore interrompe il batch
//! - `continue_on_error`: l'errore viene registrato in `failures` e si prosegue

use crate::{
    config::Config,
    error::{Result, ThumbnailError},
    file_manager::FileManager,
    json_output::{FileStatus, JsonMessage},
    processor::{
        path_resolver::{PathResolver, ResolvedFolders},
        thumbnail_task::{TaskOutcome, ThumbnailTask},
    },
    progress::{BatchStats, ProgressManager},
    resize::ImageResizer,
};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Riga di progresso: INFO in modalità verbose, DEBUG altrimenti
macro_rules! progress_line {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

/// Errore registrato per un file in modalità `continue_on_error`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Risultato di un batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub folders: ResolvedFolders,
    /// Thumbnails creati da questa invocazione, in ordine di candidato
    pub created: Vec<PathBuf>,
    /// Output già presenti, non riscritti
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
    pub stats: BatchStats,
}

impl BatchReport {
    fn new(folders: ResolvedFolders, candidates: usize) -> Self {
        Self {
            folders,
            created: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            stats: BatchStats::new(candidates),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Orchestratore del batch di thumbnails
#[derive(Debug)]
pub struct ThumbnailBatchProcessor {
    config: Config,
    task: ThumbnailTask,
}

impl ThumbnailBatchProcessor {
    /// Crea un nuovo processor validando la configurazione
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let task = ThumbnailTask::new(ImageResizer::default(), config.output_size);

        Ok(Self { config, task })
    }

    /// Esegue il batch sulla cartella `folder`
    pub async fn run(&self, folder: &Path) -> Result<BatchReport> {
        let start_time = Instant::now();
        let verbose = self.config.verbose;
        let size = self.config.output_size;

        let folders = PathResolver::resolve(folder, self.config.output_folder.as_deref()).await?;
        let suffix = size.suffix();

        let all_files = FileManager::find_png_files(&folders.input)?;
        debug!("Found {} png files in {}", all_files.len(), folders.input.display());

        let jobs = FileManager::exclude_converted(all_files, &suffix)
            .into_iter()
            .map(|input| {
                let output = PathResolver::output_path(&input, &folders.output, size)?;
                Ok::<_, ThumbnailError>((input, output))
            })
            .collect::<Result<Vec<_>>>()?;

        let total = jobs.len();
        self.emit_start(&folders, total);
        progress_line!(verbose, "Converting {} files...", total);

        let progress = ProgressManager::new(total as u64, verbose && !self.config.json_output);
        let mut report = BatchReport::new(folders, total);

        let task = &self.task;
        let outcomes = stream::iter(jobs.into_iter().enumerate())
            .map(move |(index, (input, output))| async move {
                let result = task.process(input.clone(), output.clone()).await;
                (index, input, output, result)
            })
            .buffered(self.config.workers);
        futures::pin_mut!(outcomes);

        while let Some((index, input, output, result)) = outcomes.next().await {
            let file_name = input.file_name().unwrap_or_default().to_string_lossy().into_owned();

            match result {
                Ok(TaskOutcome::Skipped { output }) => {
                    progress_line!(
                        verbose,
                        "Skipping {} because it has already been converted",
                        file_name
                    );
                    report.stats.add_skipped();
                    progress.update(&format!("[SKIP] {}", file_name));
                    self.emit_file(&input, &output, index, total, FileStatus::Skipped, None, None);
                    report.skipped.push(output);
                }
                Ok(TaskOutcome::Created { output, info }) => {
                    progress_line!(
                        verbose,
                        "File {} of {}: {} -> {}x{}",
                        index + 1,
                        total,
                        file_name,
                        info.dimensions.0,
                        info.dimensions.1
                    );
                    report.stats.add_created(info.bytes_written);
                    progress.update(&format!(
                        "[OK] {}: {}x{}",
                        file_name, info.dimensions.0, info.dimensions.1
                    ));
                    self.emit_file(
                        &input,
                        &output,
                        index,
                        total,
                        FileStatus::Created,
                        Some(info.dimensions),
                        None,
                    );
                    report.created.push(output);
                }
                Err(e) => {
                    let err = ThumbnailError::for_file(&input, e);
                    report.stats.add_error();
                    self.emit_file(
                        &input,
                        &output,
                        index,
                        total,
                        FileStatus::Failed,
                        None,
                        Some(err.to_string()),
                    );

                    if !self.config.continue_on_error {
                        progress.abandon();
                        return Err(err);
                    }

                    warn!("{}", err);
                    progress.update(&format!("[ERROR] {}", file_name));
                    report.failures.push(FileFailure {
                        input,
                        error: err.to_string(),
                    });
                }
            }
        }

        progress.finish(&report.stats.format_summary());
        progress_line!(verbose, "Finished converting {} files!", report.created.len());
        if !report.is_success() {
            error!("{} files could not be converted", report.failures.len());
        }

        if self.config.json_output {
            JsonMessage::Complete {
                created: report.created.clone(),
                stats: report.stats.clone(),
                duration_seconds: start_time.elapsed().as_secs_f64(),
            }
            .emit();
        }

        Ok(report)
    }

    /// Invia messaggio di inizio
    fn emit_start(&self, folders: &ResolvedFolders, total: usize) {
        if self.config.json_output {
            JsonMessage::Start {
                input_dir: folders.input.clone(),
                output_dir: folders.output.clone(),
                output_size: self.config.output_size,
                total_files: total,
            }
            .emit();
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_file(
        &self,
        input: &Path,
        output: &Path,
        index: usize,
        total: usize,
        status: FileStatus,
        dimensions: Option<(u32, u32)>,
        error: Option<String>,
    ) {
        if self.config.json_output {
            JsonMessage::FileComplete {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                index,
                total,
                status,
                dimensions,
                error,
            }
            .emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resize::OutputSize;
    use image::RgbImage;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::new(width, height).save(&path).unwrap();
        path
    }

    fn config(width: u32, height: u32) -> Config {
        Config::new(OutputSize::new(width, height).unwrap())
    }

    fn png_names(dir: &Path) -> BTreeSet<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".png"))
            .collect()
    }

    async fn run(config: Config, folder: &Path) -> Result<BatchReport> {
        ThumbnailBatchProcessor::new(config)?.run(folder).await
    }

    #[tokio::test]
    async fn test_end_to_end_two_photos() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_png(root, "photo1.png", 800, 600);
        write_png(root, "photo2.png", 640, 480);

        let report = run(config(200, 200), root).await.unwrap();

        let canonical = root.canonicalize().unwrap();
        assert_eq!(
            report.created,
            vec![
                canonical.join("photo1_200x200.png"),
                canonical.join("photo2_200x200.png"),
            ]
        );
        for path in &report.created {
            assert_eq!(image::image_dimensions(path).unwrap(), (200, 150));
        }
        assert_eq!(report.stats.files_created, 2);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_png(root, "a.png", 400, 300);
        write_png(root, "b.png", 300, 400);

        let first = run(config(100, 100), root).await.unwrap();
        assert_eq!(first.created.len(), 2);
        let after_first = png_names(root);

        let second = run(config(100, 100), root).await.unwrap();

        assert!(second.created.is_empty());
        assert_eq!(second.stats.files_skipped, 2);
        assert_eq!(png_names(root), after_first);
    }

    #[tokio::test]
    async fn test_converted_files_are_not_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_png(root, "a.png", 400, 200);
        write_png(root, "a_100x50.png", 100, 50);

        let report = run(config(100, 50), root).await.unwrap();

        // a_100x50.png è già presente: a.png viene saltato, a_100x50.png non è un candidato
        assert_eq!(report.stats.candidates, 1);
        assert!(report.created.is_empty());
        assert!(!root.join("a_100x50_100x50.png").exists());
    }

    #[tokio::test]
    async fn test_existing_output_is_skipped_and_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_png(root, "a.png", 400, 300);
        write_png(root, "b.png", 400, 300);
        std::fs::write(root.join("a_100x100.png"), b"not even an image").unwrap();

        let report = run(config(100, 100), root).await.unwrap();

        let canonical = root.canonicalize().unwrap();
        assert_eq!(report.created, vec![canonical.join("b_100x100.png")]);
        assert_eq!(report.skipped, vec![canonical.join("a_100x100.png")]);
        assert_eq!(std::fs::read(root.join("a_100x100.png")).unwrap(), b"not even an image");
    }

    #[tokio::test]
    async fn test_output_folder_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out").join("thumbs");
        std::fs::create_dir(&input).unwrap();
        write_png(&input, "a.png", 400, 300);

        let mut config = config(100, 100);
        config.output_folder = Some(output.clone());
        let report = run(config, &input).await.unwrap();

        assert!(report.folders.created_output);
        assert_eq!(report.created, vec![output.canonicalize().unwrap().join("a_100x100.png")]);
        assert_eq!(png_names(&input), BTreeSet::from(["a.png".to_string()]));
        assert_eq!(image::image_dimensions(output.join("a_100x100.png")).unwrap(), (100, 75));
    }

    #[tokio::test]
    async fn test_small_images_are_not_upscaled() {
        let temp_dir = TempDir::new().unwrap();
        write_png(temp_dir.path(), "tiny.png", 50, 40);

        let report = run(config(200, 200), temp_dir.path()).await.unwrap();

        assert_eq!(image::image_dimensions(&report.created[0]).unwrap(), (50, 40));
    }

    #[tokio::test]
    async fn test_missing_folder_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let err = run(config(10, 10), &missing).await.unwrap_err();

        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_zero_size_fails_before_touching_disk() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out");
        let mut config = config(10, 10);
        config.output_size = OutputSize { width: 10, height: 0 };
        config.output_folder = Some(output.clone());

        assert!(ThumbnailBatchProcessor::new(config).unwrap_err().is_validation());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_corrupt_image_aborts_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("a.png"), b"garbage").unwrap();
        write_png(root, "b.png", 400, 300);

        let err = run(config(100, 100), root).await.unwrap_err();

        assert!(matches!(err, ThumbnailError::File { .. }));
        assert!(err.to_string().contains("a.png"));
        // a.png viene prima in ordine: b.png non viene mai elaborato
        assert!(!root.join("b_100x100.png").exists());
    }

    #[tokio::test]
    async fn test_continue_on_error_collects_failures() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("a.png"), b"garbage").unwrap();
        write_png(root, "b.png", 400, 300);

        let mut config = config(100, 100);
        config.continue_on_error = true;
        let report = run(config, root).await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].input.file_name().unwrap(), "a.png");
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.stats.errors, 1);
    }

    #[tokio::test]
    async fn test_parallel_workers_keep_candidate_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..6 {
            // Dimensioni decrescenti: i primi file sono i più lenti
            write_png(root, &format!("img{}.png", i), 600 - i * 80, 400);
        }

        let mut parallel = config(64, 64);
        parallel.workers = 4;
        let report = run(parallel, root).await.unwrap();

        let canonical = root.canonicalize().unwrap();
        let expected: Vec<PathBuf> = (0..6)
            .map(|i| canonical.join(format!("img{}_64x64.png", i)))
            .collect();
        assert_eq!(report.created, expected);
    }

    // Linux accetta nomi di file con byte arbitrari (non UTF-8)
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_names_get_distinct_thumbnails() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for raw in [&b"img\xff.png"[..], &b"img\xfe.png"[..]] {
            RgbImage::new(40, 30).save(root.join(OsStr::from_bytes(raw))).unwrap();
        }

        let report = run(config(10, 10), root).await.unwrap();

        let canonical = root.canonicalize().unwrap();
        assert_eq!(
            report.created,
            vec![
                canonical.join(OsStr::from_bytes(b"img\xfe_10x10.png")),
                canonical.join(OsStr::from_bytes(b"img\xff_10x10.png")),
            ]
        );
        assert!(report.skipped.is_empty());
        for path in &report.created {
            assert_eq!(image::image_dimensions(path).unwrap(), (10, 8));
        }
    }

    #[tokio::test]
    async fn test_empty_folder() {
        let temp_dir = TempDir::new().unwrap();

        let report = run(config(10, 10), temp_dir.path()).await.unwrap();

        assert!(report.created.is_empty());
        assert_eq!(report.stats, BatchStats::new(0));
    }
}
