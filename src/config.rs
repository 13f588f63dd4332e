/// Application-level constants
pub const APP_NAME: &str = "Social Media Sentiment Analyzer";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generative model used for every classification (not user-configurable)
pub const MODEL_ID: &str = "gemini-2.0-flash";

/// Environment variable holding the default API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Column that must be present in uploaded tables
pub const POST_COLUMN: &str = "post_text";

/// Column appended to the augmented table
pub const RESULT_COLUMN: &str = "sentiment_result";

/// File name offered for the augmented table download
pub const RESULTS_FILENAME: &str = "sentiment_results.csv";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8384;

/// Upper bound for a single generateContent round trip
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Max accepted upload size for the bulk endpoint
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Log filter used when RUST_LOG is not set
pub fn default_log_filter() -> String {
    "sentiment_desk_lib=info,sentiment_desk=info,tower_http=warn".to_owned()
}
