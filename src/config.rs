use std::env;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Base URL of the remote quiz backend. Empty string disables remote calls
    /// entirely and the engine runs on the local generator alone.
    pub backend_base_url: String,
    pub quiz_load_timeout_secs: u64,
    pub submit_timeout_secs: u64,
    /// When true, a failed remote submission is graded locally instead of being
    /// surfaced as an error. Off by default.
    pub offline_grading_fallback: bool,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            backend_base_url: env::var("QUIZ_BACKEND_URL").unwrap_or_default(),
            quiz_load_timeout_secs: env::var("QUIZ_LOAD_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            submit_timeout_secs: env::var("QUIZ_SUBMIT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            offline_grading_fallback: env::var("QUIZ_OFFLINE_GRADING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            backend_base_url: "http://127.0.0.1:8080".to_string(),
            quiz_load_timeout_secs: 1,
            submit_timeout_secs: 1,
            offline_grading_fallback: false,
        }
    }
}
