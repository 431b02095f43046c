use serde::Deserialize;

/// Body of the JSON endpoints.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}
