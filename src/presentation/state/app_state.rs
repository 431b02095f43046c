use std::sync::Arc;

use crate::application::ports::LlmClient;
use crate::application::services::AnalysisService;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub struct AppState<L>
where
    L: LlmClient,
{
    pub analysis_service: Arc<AnalysisService<L>>,
    pub max_upload_bytes: usize,
}

impl<L> AppState<L>
where
    L: LlmClient,
{
    pub fn new(analysis_service: Arc<AnalysisService<L>>, max_upload_bytes: usize) -> Self {
        Self {
            analysis_service,
            max_upload_bytes,
        }
    }
}

impl<L> Clone for AppState<L>
where
    L: LlmClient,
{
    fn clone(&self) -> Self {
        Self {
            analysis_service: Arc::clone(&self.analysis_service),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
