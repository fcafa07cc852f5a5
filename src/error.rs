use thiserror::Error;

#[derive(Error, Debug)]
pub enum MobilityError {
    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data load failed: {0}")]
    DataLoad(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Dataset '{0}' has no usable rows")]
    EmptyDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MobilityError>;
