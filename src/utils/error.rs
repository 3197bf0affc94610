use thiserror::Error;

/// 上游 HTTP 呼叫的共用失敗分類，之後再轉成各操作自己的錯誤型別
#[derive(Error, Debug)]
pub enum UpstreamFailure {
    /// 非 2xx 回應，保留原始 body 文字
    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error("backend unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("request timed out")]
    TimedOut,

    #[error("invalid JSON response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamFailure::TimedOut
        } else if err.is_decode() {
            UpstreamFailure::InvalidResponse(err.to_string())
        } else {
            UpstreamFailure::Unreachable(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error("intake endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("form submission timed out")]
    TimedOut,

    #[error("invalid form: {0}")]
    InvalidForm(String),

    #[error("invalid JSON response: {0}")]
    InvalidResponse(String),
}

impl From<UpstreamFailure> for SubmitError {
    fn from(failure: UpstreamFailure) -> Self {
        match failure {
            UpstreamFailure::Rejected { status, body } => SubmitError::Rejected { status, body },
            UpstreamFailure::Unreachable(e) => SubmitError::Unreachable(e),
            UpstreamFailure::TimedOut => SubmitError::TimedOut,
            UpstreamFailure::InvalidResponse(m) => SubmitError::InvalidResponse(m),
        }
    }
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error("chat backend unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("chat request timed out")]
    TimedOut,

    #[error("invalid chat input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON response: {0}")]
    InvalidResponse(String),
}

impl From<UpstreamFailure> for ChatError {
    fn from(failure: UpstreamFailure) -> Self {
        match failure {
            UpstreamFailure::Rejected { status, body } => ChatError::Rejected { status, body },
            UpstreamFailure::Unreachable(e) => ChatError::Unreachable(e),
            UpstreamFailure::TimedOut => ChatError::TimedOut,
            UpstreamFailure::InvalidResponse(m) => ChatError::InvalidResponse(m),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// registry 或網路失敗，保留底層訊息
    #[error("{0}")]
    Upstream(String),

    #[error("professional lookup timed out")]
    TimedOut,
}

impl From<UpstreamFailure> for QueryError {
    fn from(failure: UpstreamFailure) -> Self {
        match failure {
            UpstreamFailure::TimedOut => QueryError::TimedOut,
            other => QueryError::Upstream(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum LawMateError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Professional lookup failed: {0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Chat(#[from] ChatError),

    #[error("{0}")]
    Submit(#[from] SubmitError),

    #[error("Auth context error: {message}")]
    AuthError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Network,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LawMateError {
    pub fn config(message: impl Into<String>) -> Self {
        LawMateError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LawMateError::ConfigError { .. }
            | LawMateError::MissingConfigError { .. }
            | LawMateError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LawMateError::Query(QueryError::Upstream(_)) => ErrorCategory::Upstream,
            LawMateError::Query(QueryError::TimedOut) => ErrorCategory::Network,
            LawMateError::Chat(ChatError::Rejected { .. })
            | LawMateError::Submit(SubmitError::Rejected { .. }) => ErrorCategory::Upstream,
            LawMateError::Chat(ChatError::InvalidInput(_))
            | LawMateError::Submit(SubmitError::InvalidForm(_)) => ErrorCategory::Input,
            LawMateError::Chat(_) | LawMateError::Submit(_) => ErrorCategory::Network,
            LawMateError::AuthError { .. } => ErrorCategory::Input,
            LawMateError::IoError(_) | LawMateError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Upstream => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息；上游錯誤保留原始文字
    pub fn user_friendly_message(&self) -> String {
        match self {
            LawMateError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            LawMateError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            LawMateError::Query(QueryError::Upstream(message)) => {
                format!("Could not load legal professionals: {}", message)
            }
            LawMateError::Chat(ChatError::Rejected { body, .. })
            | LawMateError::Submit(SubmitError::Rejected { body, .. }) => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Set LAWMATE_API_URL, LAWMATE_REGISTRY_URL and LAWMATE_REGISTRY_KEY, or pass --config"
            }
            ErrorCategory::Network => "Check that the backend is reachable and try again",
            ErrorCategory::Upstream => "Inspect the backend response above; the request was not retried",
            ErrorCategory::Input => "Correct the input and resubmit",
            ErrorCategory::System => "Check file permissions and disk state",
        }
    }
}

pub type Result<T> = std::result::Result<T, LawMateError>;
