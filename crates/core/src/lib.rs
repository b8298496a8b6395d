pub mod domain;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod scoring;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub fmp_api_key: Option<String>,
        pub fmp_base_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                fmp_api_key: non_empty_var("FMP_API_KEY"),
                fmp_base_url: non_empty_var("FMP_BASE_URL"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_fmp_api_key(&self) -> anyhow::Result<&str> {
            self.fmp_api_key
                .as_deref()
                .context("FMP_API_KEY is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

}
