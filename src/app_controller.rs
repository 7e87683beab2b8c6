use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::app_config::Config;
use crate::audio_probe::AudioProbe;
use crate::document_selector::DocumentSelector;
use crate::epub_archive::EpubArchive;
use crate::file_utils::FileManager;
use crate::opf_editor::{OpfEdit, OpfEditor};
use crate::page_range::PageRangeSet;
use crate::sync_orchestrator::SyncOrchestrator;
use crate::timing_source::TimingSource;
use crate::xhtml_document::XhtmlDocument;

// @module: Application controller for read-along package builds

/// One read-along build request
#[derive(Debug, Clone)]
pub struct BuildJob {
    // @field: Source EPUB package
    pub epub_path: PathBuf,

    // @field: Narration audio file
    pub audio_path: PathBuf,

    // @field: Word timing file, one start/end pair per line
    pub timing_path: PathBuf,

    // @field: Optional stylesheet appended to the book's CSS
    pub css_path: Option<PathBuf>,

    // @field: Optional page range spec like `1,2,5-8`
    pub page_range: Option<String>,

    // @field: Optional explicit output path
    pub output_path: Option<PathBuf>,
}

/// Counts reported after a successful build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    /// Content documents processed
    pub documents: usize,
    /// Words aligned across the whole set
    pub words: usize,
}

/// Main application controller for read-along generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the main workflow: extract the package, synchronize text and
    /// audio, and repack the result beside the source.
    ///
    /// Nothing is committed until the whole selected set aligned; the
    /// output file only appears on success.
    pub fn run(&self, job: &BuildJob) -> Result<PathBuf> {
        let start_time = std::time::Instant::now();
        self.validate_inputs(job)?;

        let workdir = TempDir::new().context("Failed to create temporary working directory")?;
        let package_dir = workdir.path().join("epub");
        EpubArchive::extract(&job.epub_path, &package_dir)?;
        debug!("Extracted EPUB to {:?}", package_dir);

        let duration_seconds = AudioProbe::duration_seconds(&job.audio_path)?;
        let summary = self.process_package(&package_dir, job, duration_seconds)?;

        let output_path = match &job.output_path {
            Some(path) => path.clone(),
            None => self.derive_output_path(&job.epub_path)?,
        };
        EpubArchive::pack(&package_dir, &output_path)?;

        info!(
            "Built {:?}: {} documents, {} words in {:.1}s",
            output_path,
            summary.documents,
            summary.words,
            start_time.elapsed().as_secs_f64()
        );
        Ok(output_path)
    }

    /// Synchronize an already extracted package in place.
    ///
    /// Expects the conventional layout: content documents under
    /// `OEBPS/text/*.xhtml`, package document at `OEBPS/content.opf`.
    /// Overlays are written to `OEBPS/smil/` and the narration audio is
    /// copied to `OEBPS/audio/`.
    pub fn process_package(
        &self,
        package_dir: &Path,
        job: &BuildJob,
        audio_duration_seconds: u64,
    ) -> Result<SyncSummary> {
        let oebps = package_dir.join("OEBPS");
        if !FileManager::dir_exists(&oebps) {
            return Err(anyhow!(
                "Package has no OEBPS directory: {:?} does not look like an EPUB",
                package_dir
            ));
        }

        let audio_filename = job
            .audio_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Audio path has no file name: {:?}", job.audio_path))?;
        let audio_media_type = AudioProbe::media_type(&audio_filename).ok_or_else(|| {
            anyhow!("Unrecognized audio file type: {}", audio_filename)
        })?;
        FileManager::copy_file(&job.audio_path, oebps.join("audio").join(&audio_filename))?;

        // Select content documents by inferred page number
        let text_dir = oebps.join("text");
        let stems = FileManager::find_file_stems(&text_dir, "xhtml")
            .with_context(|| format!("Failed to scan {:?}", text_dir))?;
        let ranges = match &job.page_range {
            Some(spec) => PageRangeSet::parse(spec),
            None => PageRangeSet::default(),
        };
        let selected = DocumentSelector::select(&stems, &ranges);
        info!("Processing {} of {} content documents", selected.len(), stems.len());

        // Parse the selected documents in reading order
        let mut documents = Vec::with_capacity(selected.len());
        for stem in &selected {
            let path = text_dir.join(format!("{stem}.xhtml"));
            let source = FileManager::read_to_string(&path)?;
            let page_number = DocumentSelector::extract_page_number(stem);
            documents.push(XhtmlDocument::parse(stem, page_number, &source)?);
        }

        // Tokenize and align the whole set before committing anything
        let mut timing = TimingSource::from_path(&job.timing_path)?;
        let results = SyncOrchestrator::run(documents, &mut timing, &audio_filename)?;

        // Write mutated documents and their overlays
        let progress = ProgressBar::new(results.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        let smil_dir = oebps.join("smil");
        let mut words = 0;
        for sync in &results {
            progress.set_message(sync.document.stem.clone());
            FileManager::write_to_file(
                text_dir.join(format!("{}.xhtml", sync.document.stem)),
                &sync.document.to_xml_string()?,
            )?;
            FileManager::write_to_file(
                smil_dir.join(sync.overlay.file_name()),
                &sync.overlay.to_smil_string()?,
            )?;
            words += sync.overlay.points.len();
            progress.inc(1);
        }
        progress.finish_and_clear();

        // Register the overlays, the audio and the media metadata in the
        // package document
        let opf_path = oebps.join("content.opf");
        let opf_source = FileManager::read_to_string(&opf_path)?;
        let edited = OpfEditor::edit(
            &opf_source,
            &OpfEdit {
                stems: &selected,
                audio_file: &audio_filename,
                audio_media_type,
                duration_seconds: audio_duration_seconds,
                active_class: &self.config.active_class,
            },
        )?;
        FileManager::write_to_file(&opf_path, &edited)?;

        // Append the user stylesheet, if any
        if let Some(css_path) = &job.css_path {
            let css = FileManager::read_to_string(css_path)?;
            FileManager::append_with_newline(oebps.join("styles").join("style.css"), &css)?;
            debug!("Appended {:?} to the package stylesheet", css_path);
        }

        Ok(SyncSummary { documents: results.len(), words })
    }

    /// Validate that every input file of a job exists
    fn validate_inputs(&self, job: &BuildJob) -> Result<()> {
        if !FileManager::file_exists(&job.epub_path) {
            return Err(anyhow!("EPUB file does not exist: {:?}", job.epub_path));
        }
        if !FileManager::file_exists(&job.audio_path) {
            return Err(anyhow!("Audio file does not exist: {:?}", job.audio_path));
        }
        if !FileManager::file_exists(&job.timing_path) {
            return Err(anyhow!("Timing file does not exist: {:?}", job.timing_path));
        }
        if let Some(css_path) = &job.css_path {
            if !FileManager::file_exists(css_path) {
                return Err(anyhow!("CSS file does not exist: {:?}", css_path));
            }
        }
        Ok(())
    }

    /// Output path beside the source: `<stem><suffix>.epub`
    fn derive_output_path(&self, epub_path: &Path) -> Result<PathBuf> {
        let stem = epub_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("EPUB path has no file name: {:?}", epub_path))?;
        let file_name = format!("{}{}.epub", stem, self.config.output_suffix);
        Ok(match epub_path.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        })
    }
}
