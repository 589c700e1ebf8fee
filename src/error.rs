use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinancialInsightsError {
    #[error("No table found: no row contains the anchor month '{0}'")]
    NoTableFound(String),

    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Workbook has no sheets: {0}")]
    EmptyWorkbook(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FinancialInsightsError {
    /// True for failures that mean "no data available" to the caller, as opposed to
    /// configuration or export mistakes.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Self::NoTableFound(_)
                | Self::SheetNotFound(_)
                | Self::EmptyWorkbook(_)
                | Self::UnsupportedFormat(_)
                | Self::Workbook(_)
                | Self::Csv(_)
                | Self::IoError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FinancialInsightsError>;
