//! Error types for template assembly and parameter handling

use thiserror::Error;

/// Errors raised while declaring or finishing a template
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Invalid logical id: {0:?}")]
    InvalidLogicalId(String),
    #[error("Duplicate logical id: {0}")]
    DuplicateLogicalId(String),
    #[error("Duplicate output: {0}")]
    DuplicateOutput(String),
    #[error("Reference target does not exist: {0}")]
    UnknownReference(String),
    #[error("Template declares no resources")]
    NoResources,
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while collecting external parameters
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Parameter document is not a mapping")]
    NotAMapping,
    #[error("Parameter key is not a scalar")]
    NonScalarKey,
    #[error("Parameter value is not a scalar: {0}")]
    NonScalarValue(String),
    #[error("Invalid define, expected KEY=VALUE: {0:?}")]
    InvalidDefine(String),
    #[error("Invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
