//! Error types for the ms-app service layer.

/// Application error type that wraps errors from the pipeline crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Campaign error: {0}")]
    Campaign(#[from] ms_campaign::CampaignError),

    #[error("Design error: {0}")]
    Design(#[from] ms_design::DesignError),

    #[error("Case error: {0}")]
    Case(#[from] ms_cases::CaseError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] ms_dispatch::DispatchError),

    #[error("Results error: {0}")]
    Results(#[from] ms_results::ResultsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for ms-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ms_dispatch::SchedulerError> for AppError {
    fn from(err: ms_dispatch::SchedulerError) -> Self {
        AppError::Dispatch(ms_dispatch::DispatchError::QueueQuery(err))
    }
}
