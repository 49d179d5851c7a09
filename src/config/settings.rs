// Configuration structs

/// Model used when the config does not name one.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key
    pub openai_api_key: String,

    /// Chat model identifier
    pub openai_model: String,

    /// Supabase project URL
    pub supabase_url: String,

    /// Supabase service key (full read access)
    pub supabase_service_key: String,
}

impl Config {
    pub fn new(
        openai_api_key: impl Into<String>,
        supabase_url: impl Into<String>,
        supabase_service_key: impl Into<String>,
    ) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            openai_model: DEFAULT_MODEL.to_string(),
            supabase_url: supabase_url.into(),
            supabase_service_key: supabase_service_key.into(),
        }
    }
}
