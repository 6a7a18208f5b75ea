use std::io;

use thiserror::Error;

/// Result type used across the Carteira core crate.
pub type Result<T> = std::result::Result<T, CarteiraError>;

/// Canonical error representation shared by all services.
#[derive(Debug, Error)]
pub enum CarteiraError {
    #[error("Erro de I/O: {0}")]
    IoError(#[from] io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(String),

    #[error("Erro de deserialização: {0}")]
    DeserializationError(String),

    #[error("Campos obrigatórios ausentes: {0}")]
    MissingFields(String),

    #[error("Não autorizado")]
    Unauthorized,

    #[error("Erro no armazenamento: {0}")]
    StoreError(String),

    #[error("Timeline não encontrada: {0}")]
    TimelineNotFound(String),

    #[error("Evento não encontrado: {0}")]
    EventNotFound(String),

    #[error("Erro geral: {0}")]
    GeneralError(String),

    #[error("Erro de configuração: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for CarteiraError {
    fn from(err: serde_json::Error) -> Self {
        CarteiraError::DeserializationError(err.to_string())
    }
}

impl From<sqlx::Error> for CarteiraError {
    fn from(err: sqlx::Error) -> Self {
        CarteiraError::StoreError(err.to_string())
    }
}

impl From<anyhow::Error> for CarteiraError {
    fn from(err: anyhow::Error) -> Self {
        CarteiraError::GeneralError(err.to_string())
    }
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Variável de ambiente obrigatória ausente: {0}")]
    MissingEnvVar(String),

    #[error("Valor inválido para variável de ambiente {key}: {source}")]
    InvalidEnvVar {
        key: &'static str,
        #[source]
        source: std::env::VarError,
    },

    #[error("Erro interno: {0}")]
    Internal(String),
}

impl From<ConfigError> for CarteiraError {
    fn from(value: ConfigError) -> Self {
        CarteiraError::ConfigError(value.to_string())
    }
}
