use std::io::{Cursor, Read};
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, ExtractionResult, RawTable};

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const DOCUMENT_PART: &str = "word/document.xml";

/// Reads body paragraphs, inline pictures and top-level tables out of a
/// WordprocessingML package.
#[derive(Default)]
pub struct DocxAdapter;

impl DocxAdapter {
    pub fn new() -> Self {
        Self
    }

    fn read_document_part(data: &[u8]) -> Result<String, FileLoaderError> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("not a DOCX package: {e}")))?;

        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("missing {DOCUMENT_PART}: {e}"))
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read {DOCUMENT_PART}: {e}"))
        })?;

        Ok(xml)
    }
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(document_id = %document.id, filename = %document.filename)
    )]
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractionResult, FileLoaderError> {
        if document.content_type != ContentType::Docx {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let owned = data.to_vec();
        let result = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || {
                let xml = Self::read_document_part(&owned)?;
                parse_document_xml(&xml)
            }),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("DOCX extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        tracing::info!(
            text_len = result.full_text.len(),
            tables = result.tables.len(),
            images = result.image_count,
            "DOCX extraction complete"
        );

        Ok(result)
    }
}

#[derive(Default)]
struct TableBuilder {
    rows: RawTable,
    row: Option<Vec<String>>,
    cell: Option<CellBuilder>,
}

struct CellBuilder {
    paragraphs: Vec<String>,
    span: usize,
}

#[derive(Default)]
struct DocumentWalker {
    result: ExtractionResult,
    paragraph: Option<String>,
    paragraph_depth: usize,
    table_depth: usize,
    table: TableBuilder,
    in_run: bool,
    in_text: bool,
    in_inline: bool,
    inline_counted: bool,
    /// Depth inside text boxes and markup-compatibility fallbacks, whose
    /// content is not part of the body.
    skipped_depth: usize,
}

fn is_skipped_container(name: &[u8]) -> bool {
    matches!(name, b"w:txbxContent" | b"mc:Fallback")
}

impl DocumentWalker {
    fn open(&mut self, element: &BytesStart<'_>) {
        if is_skipped_container(element.name().as_ref()) {
            self.skipped_depth += 1;
            return;
        }
        if self.skipped_depth > 0 {
            return;
        }
        match element.name().as_ref() {
            b"w:p" => {
                if self.paragraph_depth == 0 {
                    self.paragraph = Some(String::new());
                }
                self.paragraph_depth += 1;
            }
            b"w:r" => self.in_run = true,
            b"w:t" => self.in_text = true,
            b"w:tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = TableBuilder::default();
                }
            }
            b"w:tr" if self.table_depth == 1 => self.table.row = Some(Vec::new()),
            b"w:tc" if self.table_depth == 1 => {
                self.table.cell = Some(CellBuilder {
                    paragraphs: Vec::new(),
                    span: 1,
                })
            }
            b"wp:inline" => {
                self.in_inline = true;
                self.inline_counted = false;
            }
            b"pic:pic" if self.in_inline && !self.inline_counted => {
                self.result.image_count += 1;
                self.inline_counted = true;
            }
            _ => self.marker(element),
        }
    }

    fn close(&mut self, name: &[u8]) {
        if is_skipped_container(name) {
            self.skipped_depth = self.skipped_depth.saturating_sub(1);
            return;
        }
        if self.skipped_depth > 0 {
            return;
        }
        match name {
            b"w:p" => {
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
                if self.paragraph_depth == 0 {
                    let text = self.paragraph.take().unwrap_or_default();
                    self.finish_paragraph(text);
                }
            }
            b"w:r" => self.in_run = false,
            b"w:t" => self.in_text = false,
            b"w:tc" if self.table_depth == 1 => {
                if let (Some(cell), Some(row)) = (self.table.cell.take(), self.table.row.as_mut())
                {
                    let text = cell.paragraphs.join("\n");
                    row.extend(std::iter::repeat_n(text, cell.span));
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                if let Some(row) = self.table.row.take() {
                    self.table.rows.push(row);
                }
            }
            b"w:tbl" => {
                if self.table_depth == 1 {
                    let rows = std::mem::take(&mut self.table.rows);
                    if rows.iter().any(|row| !row.is_empty()) {
                        self.result.tables.push(rows);
                    }
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            b"wp:inline" => self.in_inline = false,
            _ => {}
        }
    }

    /// Self-closing elements.
    fn empty(&mut self, element: &BytesStart<'_>) {
        if self.skipped_depth > 0 {
            return;
        }
        match element.name().as_ref() {
            b"w:p" if self.paragraph_depth == 0 => self.finish_paragraph(String::new()),
            b"w:gridSpan" if self.table_depth == 1 => {
                let span = element
                    .try_get_attribute("w:val")
                    .ok()
                    .flatten()
                    .and_then(|attr| std::str::from_utf8(&attr.value).ok()?.parse::<usize>().ok())
                    .filter(|span| *span > 0);
                if let (Some(span), Some(cell)) = (span, self.table.cell.as_mut()) {
                    cell.span = span;
                }
            }
            _ => self.marker(element),
        }
    }

    /// Tab and break markers inside a run; `w:tab` also appears in
    /// paragraph properties, where it is a tab stop.
    fn marker(&mut self, element: &BytesStart<'_>) {
        if !self.in_run {
            return;
        }
        let Some(paragraph) = self.paragraph.as_mut() else {
            return;
        };
        match element.name().as_ref() {
            b"w:tab" => paragraph.push('\t'),
            b"w:br" | b"w:cr" => paragraph.push('\n'),
            _ => {}
        }
    }

    fn text(&mut self, value: &str) {
        if self.in_text && self.skipped_depth == 0 {
            if let Some(paragraph) = self.paragraph.as_mut() {
                paragraph.push_str(value);
            }
        }
    }

    fn finish_paragraph(&mut self, text: String) {
        if self.table_depth == 0 {
            self.result.full_text.push_str(&text);
            self.result.full_text.push('\n');
        } else if let Some(cell) = self.table.cell.as_mut() {
            cell.paragraphs.push(text);
        }
    }
}

/// Walks `word/document.xml` and collects body text, picture count and
/// table grids.
pub fn parse_document_xml(xml: &str) -> Result<ExtractionResult, FileLoaderError> {
    let mut reader = Reader::from_str(xml);
    let mut walker = DocumentWalker::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => walker.open(e),
            Ok(Event::Empty(ref e)) => walker.empty(e),
            Ok(Event::End(ref e)) => walker.close(e.name().as_ref()),
            Ok(Event::Text(e)) => {
                let value = e.unescape().map_err(|err| {
                    FileLoaderError::ExtractionFailed(format!("bad text in {DOCUMENT_PART}: {err}"))
                })?;
                walker.text(&value);
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(FileLoaderError::ExtractionFailed(format!(
                    "failed to parse {DOCUMENT_PART}: {err}"
                )));
            }
            _ => {}
        }
    }

    Ok(walker.result)
}
