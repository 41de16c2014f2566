use thiserror::Error;

/// Invalid arena tuning or an unreadable settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Grid size must be odd and between 5 and 255, got {0}")]
    InvalidGridSize(i32),

    #[error("Cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),

    #[error("Probability `{name}` must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Interval `{name}` must be positive, got {value}")]
    InvalidInterval { name: &'static str, value: f32 },

    #[error("Sampler attempt cap must be at least 1")]
    ZeroAttempts,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Missing required fields: player and points")]
    MissingFields,

    #[error("Not allowed in production")]
    Forbidden,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Score store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SocialError {
    #[error("Social service is not configured. Set the API credentials to enable it.")]
    NotConfigured,

    #[error("Missing required fields: winner and loser")]
    MissingFields,

    #[error("Social client error: {0}")]
    Client(String),
}

/// Every failure that can reach the request boundary
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Social(#[from] SocialError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Endpoint not found")]
    NotFound,
}

impl ApiError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound => 404,
            ApiError::Score(ScoreError::MissingFields) => 400,
            ApiError::Score(ScoreError::Forbidden) => 403,
            ApiError::Score(_) => 500,
            ApiError::Social(SocialError::MissingFields) => 400,
            ApiError::Social(SocialError::NotConfigured) => 503,
            ApiError::Social(SocialError::Client(_)) => 500,
        }
    }
}
