use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{OcrEngine, OcrError, WordBox};
use crate::presentation::config::OcrSettings;

/// Tesseract's TSV level for individual words.
const WORD_LEVEL: &str = "5";
const TSV_COLUMNS: usize = 12;

/// Runs the `tesseract` CLI as a child process, feeding the image on stdin.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
    threads: usize,
    timeout: Duration,
}

impl TesseractEngine {
    /// Resolves the configured binary on `PATH`.
    pub fn locate(settings: &OcrSettings) -> Result<Self, OcrError> {
        let binary = which::which(&settings.binary).map_err(|e| {
            OcrError::Unavailable(format!("{} not found on PATH: {e}", settings.binary))
        })?;

        Ok(Self::new(
            binary,
            &settings.language,
            settings.threads,
            Duration::from_secs(settings.timeout_secs),
        ))
    }

    pub fn new(binary: PathBuf, language: &str, threads: usize, timeout: Duration) -> Self {
        Self {
            binary,
            language: language.to_string(),
            threads: threads.max(1),
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Fails unless the configured language data is installed.
    pub async fn verify_language(&self) -> Result<(), OcrError> {
        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.binary)
                .arg("--list-langs")
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| OcrError::ProcessFailed("--list-langs timed out".to_string()))?
        .map_err(|e| OcrError::Unavailable(e.to_string()))?;

        // Older releases print the list on stderr.
        let listing = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if listed_languages(&listing).any(|lang| lang == self.language) {
            Ok(())
        } else {
            Err(OcrError::Unavailable(format!(
                "language data '{}' is not installed",
                self.language
            )))
        }
    }

    #[tracing::instrument(skip(self, image), fields(bytes = image.len(), mode = %extra_args.join(" ")))]
    async fn run(&self, image: &[u8], extra_args: &[&str]) -> Result<String, OcrError> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", &self.language])
            .args(extra_args)
            .env("OMP_THREAD_LIMIT", self.threads.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OcrError::Unavailable(format!("failed to spawn tesseract: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::ProcessFailed("stdin not captured".to_string()))?;
        let input = image.to_vec();
        let feed = async move {
            let written = stdin.write_all(&input).await;
            drop(stdin);
            written
        };

        let (fed, output) = tokio::time::timeout(self.timeout, async {
            tokio::join!(feed, child.wait_with_output())
        })
        .await
        .map_err(|_| OcrError::ProcessFailed("tesseract timed out".to_string()))?;

        let output = output.map_err(|e| OcrError::ProcessFailed(e.to_string()))?;
        fed.map_err(|e| OcrError::ProcessFailed(format!("failed to write image: {e}")))?;

        if !output.status.success() {
            return Err(OcrError::ProcessFailed(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| OcrError::InvalidOutput(e.to_string()))
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn image_to_string(&self, image: &[u8]) -> Result<String, OcrError> {
        self.run(image, &[]).await
    }

    async fn image_to_words(&self, image: &[u8]) -> Result<Vec<WordBox>, OcrError> {
        let tsv = self.run(image, &["tsv"]).await?;
        let words = parse_tsv(&tsv)?;
        tracing::debug!(words = words.len(), "Parsed word layout");
        Ok(words)
    }
}

fn listed_languages(listing: &str) -> impl Iterator<Item = &str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
}

/// Reads word rows out of tesseract's TSV output. Non-word levels, blank
/// words and rows with negative confidence are skipped.
pub fn parse_tsv(tsv: &str) -> Result<Vec<WordBox>, OcrError> {
    let mut words = Vec::new();

    for (index, line) in tsv.lines().enumerate() {
        if index == 0 || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
        if fields.len() < TSV_COLUMNS - 1 {
            return Err(OcrError::InvalidOutput(format!(
                "line {} has {} columns",
                index + 1,
                fields.len()
            )));
        }
        if fields[0] != WORD_LEVEL {
            continue;
        }

        let text = fields.get(11).map(|t| t.trim()).unwrap_or_default();
        let confidence = number(fields[10], index)?;
        if text.is_empty() || confidence < 0.0 {
            continue;
        }

        words.push(WordBox {
            text: text.to_string(),
            left: number(fields[6], index)?,
            top: number(fields[7], index)?,
            width: number(fields[8], index)?,
            height: number(fields[9], index)?,
            confidence,
            line: (
                integer(fields[2], index)?,
                integer(fields[3], index)?,
                integer(fields[4], index)?,
            ),
        });
    }

    Ok(words)
}

fn number(field: &str, index: usize) -> Result<f32, OcrError> {
    field
        .trim()
        .parse()
        .map_err(|_| OcrError::InvalidOutput(format!("line {}: bad number '{field}'", index + 1)))
}

fn integer(field: &str, index: usize) -> Result<u32, OcrError> {
    field
        .trim()
        .parse()
        .map_err(|_| OcrError::InvalidOutput(format!("line {}: bad index '{field}'", index + 1)))
}
