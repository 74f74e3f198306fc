//! Core types for stackdsl
//!
//! This crate provides the CloudFormation template model and the external
//! parameter handling shared by all stackdsl blueprints.

pub mod error;
pub mod params;
pub mod template;

pub use error::{ParamsError, TemplateError};
pub use params::{ExternalParameters, ParamValue};
pub use template::{
    Output, Parameter, ParameterType, PropertyValue, Resource, Template, TemplateBuilder,
};
