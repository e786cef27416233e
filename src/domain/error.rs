//! Domain error types.

/// Top-level error type for sectorboard.
#[derive(Debug, thiserror::Error)]
pub enum SectorboardError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("sector mapping {file} is missing required column(s): {}", missing.join(", "))]
    MissingMappingColumns { file: String, missing: Vec<String> },

    #[error("price file for {ticker} is missing required column(s): {}", missing.join(", "))]
    MissingPriceColumns {
        ticker: String,
        missing: Vec<String>,
    },

    #[error("no price file for {ticker}")]
    NoPriceFile { ticker: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no usable tickers under {root}")]
    NoTickers { root: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SectorboardError> for std::process::ExitCode {
    fn from(err: &SectorboardError) -> Self {
        let code: u8 = match err {
            SectorboardError::Io(_) => 1,
            SectorboardError::ConfigParse { .. }
            | SectorboardError::ConfigMissing { .. }
            | SectorboardError::ConfigInvalid { .. } => 2,
            SectorboardError::MissingMappingColumns { .. }
            | SectorboardError::MissingPriceColumns { .. }
            | SectorboardError::NoPriceFile { .. }
            | SectorboardError::Data { .. } => 3,
            SectorboardError::NoTickers { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
