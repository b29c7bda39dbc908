//! Error types for the showroom controller

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowroomError {
    #[error("Render target not found: #{0}")]
    MissingRenderTarget(String),
    #[error("Failed to parse showroom config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Invalid showroom config: {0}")]
    InvalidConfig(String),
    #[error("Unknown model name: {0}")]
    UnknownModel(String),
    #[error("Invalid color literal: {0}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, ShowroomError>;
