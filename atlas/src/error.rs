use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("no geometry column found in table {0}")]
    NoGeometryColumn(String),
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{0}` environment variable should be set")]
    Missing(&'static str),

    #[error("`{var}` should be a number, got: {value}")]
    InvalidNumber { var: &'static str, value: String },
}
