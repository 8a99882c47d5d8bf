/// Completion service endpoints
pub const API_HEALTH: &str = "/health";
pub const API_PARAMETER_DEFAULTS: &str = "/parameters/defaults";
pub const API_CHAT_COMPLETIONS: &str = "/chat/completions";
pub const API_MODELS: &str = "/models";

/// Record content markers
pub const NO_RESPONSE_CONTENT: &str = "No response content";
pub const UNKNOWN_ERROR: &str = "Unknown error";
pub const API_ERROR_PREFIX: &str = "Error: ";
pub const NETWORK_ERROR_PREFIX: &str = "Network error: ";

/// Health payload status value that counts as fully healthy
pub const HEALTH_STATUS_HEALTHY: &str = "healthy";

/// Response headers
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const HEADER_CACHE_CONTROL: &str = "no-cache";

/// Error messages
pub const ERROR_EMPTY_PROMPT: &str = "prompt is empty";
pub const ERROR_BUSY: &str = "a submission is already in flight";
pub const ERROR_SERVICE_UNAVAILABLE: &str = "completion service not available";
pub const ERROR_TIMEOUT: &str = "request timed out";
pub const ERROR_CANCELLED: &str = "request cancelled";

/// Logging prefixes
pub const LOG_PREFIX_SUCCESS: &str = "✅";
pub const LOG_PREFIX_ERROR: &str = "❌";
pub const LOG_PREFIX_WARNING: &str = "⚠️";

/// Maximum accepted JSON body size (bytes)
pub const MAX_JSON_BODY_SIZE_BYTES: u64 = 1024 * 1024;

/// How long shutdown waits for a cancelled submission to record its outcome
pub const SHUTDOWN_GRACE_SECS: u64 = 5;
