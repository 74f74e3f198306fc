//! CloudFormation template model
//!
//! A template is assembled through [`TemplateBuilder`] as a sequence of
//! declarations (parameters, resources, outputs) and validated when
//! finished. Maps are ordered so serialized output is deterministic.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::TemplateError;

/// Template format version emitted in every document
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Types accepted for declared input parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterType {
    String,
    Number,
    CommaDelimitedList,
}

/// A declared input parameter
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    #[serde(rename = "Type")]
    parameter_type: ParameterType,
    #[serde(rename = "Default", skip_serializing_if = "Option::is_none")]
    default: Option<PropertyValue>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Parameter {
    pub fn new(parameter_type: ParameterType) -> Self {
        Self {
            parameter_type,
            default: None,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(ParameterType::String)
    }

    pub fn number() -> Self {
        Self::new(ParameterType::Number)
    }

    pub fn with_default(mut self, default: impl Into<PropertyValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A resource property or output value: a scalar, or a reference resolved
/// when the document is processed (`Ref`, `Fn::GetAtt`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Ref {
        #[serde(rename = "Ref")]
        logical_id: String,
    },
    GetAtt {
        #[serde(rename = "Fn::GetAtt")]
        target: (String, String),
    },
}

impl PropertyValue {
    /// A `{"Ref": ...}` intrinsic pointing at a parameter or resource
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref {
            logical_id: logical_id.into(),
        }
    }

    /// A `{"Fn::GetAtt": [...]}` intrinsic pointing at a resource attribute
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            target: (logical_id.into(), attribute.into()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A declared resource
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    resource_type: String,
    #[serde(rename = "Properties", skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, PropertyValue>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }
}

/// A declared output, optionally exported under a stack-global name
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    #[serde(rename = "Value")]
    value: PropertyValue,
    #[serde(rename = "Export", skip_serializing_if = "Option::is_none")]
    export: Option<Export>,
}

#[derive(Debug, Clone, Serialize)]
struct Export {
    #[serde(rename = "Name")]
    name: String,
}

impl Output {
    pub fn new(value: impl Into<PropertyValue>) -> Self {
        Self {
            value: value.into(),
            export: None,
        }
    }

    pub fn with_export(mut self, name: impl Into<String>) -> Self {
        self.export = Some(Export { name: name.into() });
        self
    }
}

/// An assembled CloudFormation document
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: &'static str,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, Parameter>,
    #[serde(rename = "Resources")]
    resources: BTreeMap<String, Resource>,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn parameters(&self) -> &BTreeMap<String, Parameter> {
        &self.parameters
    }

    pub fn resources(&self) -> &BTreeMap<String, Resource> {
        &self.resources
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, TemplateError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Declare-style construction of a [`Template`]
///
/// Logical ids for parameters and resources share one namespace; outputs
/// have their own. Every declaration validates its id, `finish` validates
/// the references between declared elements.
#[derive(Debug)]
pub struct TemplateBuilder {
    template: Template,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self {
            template: Template {
                format_version: TEMPLATE_FORMAT_VERSION,
                description: None,
                parameters: BTreeMap::new(),
                resources: BTreeMap::new(),
                outputs: BTreeMap::new(),
            },
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.template.description = Some(description.into());
        self
    }

    pub fn parameter(
        mut self,
        name: impl Into<String>,
        parameter: Parameter,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        validate_logical_id(&name)?;
        if self.template.parameters.contains_key(&name)
            || self.template.resources.contains_key(&name)
        {
            return Err(TemplateError::DuplicateLogicalId(name));
        }

        debug!(name = %name, "Declared parameter");
        self.template.parameters.insert(name, parameter);
        Ok(self)
    }

    pub fn resource(
        mut self,
        logical_id: impl Into<String>,
        resource: Resource,
    ) -> Result<Self, TemplateError> {
        let logical_id = logical_id.into();
        validate_logical_id(&logical_id)?;
        if self.template.parameters.contains_key(&logical_id)
            || self.template.resources.contains_key(&logical_id)
        {
            return Err(TemplateError::DuplicateLogicalId(logical_id));
        }

        debug!(logical_id = %logical_id, resource_type = %resource.resource_type, "Declared resource");
        self.template.resources.insert(logical_id, resource);
        Ok(self)
    }

    pub fn output(mut self, name: impl Into<String>, output: Output) -> Result<Self, TemplateError> {
        let name = name.into();
        validate_logical_id(&name)?;
        if self.template.outputs.contains_key(&name) {
            return Err(TemplateError::DuplicateOutput(name));
        }

        debug!(name = %name, "Declared output");
        self.template.outputs.insert(name, output);
        Ok(self)
    }

    pub fn finish(self) -> Result<Template, TemplateError> {
        let template = self.template;

        if template.resources.is_empty() {
            return Err(TemplateError::NoResources);
        }
        for resource in template.resources.values() {
            for value in resource.properties.values() {
                check_reference(&template, value)?;
            }
        }
        for output in template.outputs.values() {
            check_reference(&template, &output.value)?;
        }

        info!(
            parameters = template.parameters.len(),
            resources = template.resources.len(),
            outputs = template.outputs.len(),
            "Template assembled"
        );
        Ok(template)
    }
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_logical_id(id: &str) -> Result<(), TemplateError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TemplateError::InvalidLogicalId(id.to_string()));
    }
    Ok(())
}

fn check_reference(template: &Template, value: &PropertyValue) -> Result<(), TemplateError> {
    match value {
        PropertyValue::Ref { logical_id } => {
            if !template.parameters.contains_key(logical_id)
                && !template.resources.contains_key(logical_id)
            {
                return Err(TemplateError::UnknownReference(logical_id.clone()));
            }
        }
        PropertyValue::GetAtt { target } => {
            if !template.resources.contains_key(&target.0) {
                return Err(TemplateError::UnknownReference(target.0.clone()));
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn queue_fixture() -> Template {
        TemplateBuilder::new()
            .parameter("Queuename", Parameter::string())
            .unwrap()
            .resource(
                "queue",
                Resource::new("AWS::SQS::Queue")
                    .with_property("QueueName", PropertyValue::reference("Queuename"))
                    .with_property("DelaySeconds", 5),
            )
            .unwrap()
            .output(
                "Queue",
                Output::new(PropertyValue::reference("queue")).with_export("Queue"),
            )
            .unwrap()
            .finish()
            .unwrap()
    }

    #[test]
    fn test_serializes_cloudformation_shape() {
        let value = serde_json::to_value(queue_fixture()).unwrap();
        assert_eq!(
            value,
            json!({
                "AWSTemplateFormatVersion": "2010-09-09",
                "Parameters": {
                    "Queuename": { "Type": "String" }
                },
                "Resources": {
                    "queue": {
                        "Type": "AWS::SQS::Queue",
                        "Properties": {
                            "QueueName": { "Ref": "Queuename" },
                            "DelaySeconds": 5
                        }
                    }
                },
                "Outputs": {
                    "Queue": {
                        "Value": { "Ref": "queue" },
                        "Export": { "Name": "Queue" }
                    }
                }
            })
        );
    }

    #[test]
    fn test_yaml_output() {
        let yaml = queue_fixture().to_yaml().unwrap();
        assert!(yaml.contains("Type: AWS::SQS::Queue"));
        assert!(yaml.contains("Ref: Queuename"));
        assert!(yaml.contains("DelaySeconds: 5"));
    }

    #[test]
    fn test_parameter_default_and_description() {
        let value = serde_json::to_value(
            Parameter::number()
                .with_default(30)
                .with_description("Visibility timeout"),
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "Type": "Number",
                "Default": 30,
                "Description": "Visibility timeout"
            })
        );
    }

    #[test]
    fn test_get_att_serialization() {
        let value = serde_json::to_value(PropertyValue::get_att("queue", "Arn")).unwrap();
        assert_eq!(value, json!({ "Fn::GetAtt": ["queue", "Arn"] }));
    }

    #[test]
    fn test_duplicate_logical_id_rejected() {
        let result = TemplateBuilder::new()
            .parameter("queue", Parameter::string())
            .unwrap()
            .resource("queue", Resource::new("AWS::SQS::Queue"));
        assert!(matches!(
            result,
            Err(TemplateError::DuplicateLogicalId(name)) if name == "queue"
        ));
    }

    #[test]
    fn test_duplicate_output_rejected() {
        let result = TemplateBuilder::new()
            .output("Queue", Output::new("a"))
            .unwrap()
            .output("Queue", Output::new("b"));
        assert!(matches!(result, Err(TemplateError::DuplicateOutput(_))));
    }

    #[test]
    fn test_invalid_logical_id_rejected() {
        assert!(matches!(
            TemplateBuilder::new().resource("my-queue", Resource::new("AWS::SQS::Queue")),
            Err(TemplateError::InvalidLogicalId(_))
        ));
        assert!(matches!(
            TemplateBuilder::new().parameter("", Parameter::string()),
            Err(TemplateError::InvalidLogicalId(_))
        ));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let result = TemplateBuilder::new()
            .resource(
                "queue",
                Resource::new("AWS::SQS::Queue")
                    .with_property("QueueName", PropertyValue::reference("Queuename")),
            )
            .unwrap()
            .finish();
        assert!(matches!(
            result,
            Err(TemplateError::UnknownReference(name)) if name == "Queuename"
        ));
    }

    #[test]
    fn test_dangling_get_att_rejected() {
        let result = TemplateBuilder::new()
            .resource("queue", Resource::new("AWS::SQS::Queue"))
            .unwrap()
            .output("Arn", Output::new(PropertyValue::get_att("missing", "Arn")))
            .unwrap()
            .finish();
        assert!(matches!(result, Err(TemplateError::UnknownReference(_))));
    }

    #[test]
    fn test_empty_template_rejected() {
        assert!(matches!(
            TemplateBuilder::new().finish(),
            Err(TemplateError::NoResources)
        ));
    }
}
