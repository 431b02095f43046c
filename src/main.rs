use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use docbridge::application::ports::{FileLoader, OcrEngine};
use docbridge::application::services::{AnalysisService, RetryPolicy, SummarizationService};
use docbridge::domain::ContentType;
use docbridge::infrastructure::llm::GeminiClient;
use docbridge::infrastructure::observability::{TracingConfig, init_tracing};
use docbridge::infrastructure::ocr::TesseractEngine;
use docbridge::infrastructure::text_processing::{
    BorderlessTableDetector, CompositeFileLoader, CsvAdapter, DocxAdapter, ImageAdapter,
    PdfAdapter, PlainTextAdapter,
};
use docbridge::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("failed to load settings")?;

    init_tracing(&TracingConfig::new(environment.as_str(), settings.logging.json));

    let ocr = TesseractEngine::locate(&settings.ocr).context("OCR engine unavailable")?;
    ocr.verify_language()
        .await
        .context("OCR language data unavailable")?;
    tracing::info!(binary = %ocr.binary().display(), language = %settings.ocr.language, "OCR engine ready");
    let ocr: Arc<dyn OcrEngine> = Arc::new(ocr);

    let llm_client = Arc::new(
        GeminiClient::new(
            &settings.llm.base_url,
            &settings.llm.model,
            &settings.llm.api_key,
            Duration::from_secs(settings.llm.request_timeout_secs),
        )
        .context("failed to build model client")?,
    );

    let detector = settings.ocr.borderless_tables.then(|| {
        BorderlessTableDetector::new(settings.ocr.min_confidence, settings.ocr.implicit_rows)
    });

    let adapters: Vec<(ContentType, Arc<dyn FileLoader>)> = vec![
        (ContentType::Text, Arc::new(PlainTextAdapter)),
        (ContentType::Csv, Arc::new(CsvAdapter)),
        (ContentType::Image, Arc::new(ImageAdapter::new(ocr, detector))),
        (ContentType::Pdf, Arc::new(PdfAdapter::new())),
        (ContentType::Docx, Arc::new(DocxAdapter::new())),
    ];
    let file_loader: Arc<dyn FileLoader> = Arc::new(CompositeFileLoader::new(adapters));

    let summarizer = Arc::new(SummarizationService::with_retry_policy(
        llm_client,
        RetryPolicy {
            max_attempts: settings.llm.max_attempts,
            delay: Duration::from_millis(settings.llm.retry_delay_ms),
        },
    ));

    let analysis_service = Arc::new(AnalysisService::new(file_loader, summarizer));
    let state = AppState::new(analysis_service, settings.server.max_upload_bytes);

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
