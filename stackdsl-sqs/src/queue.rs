//! The parameterized queue template

use stackdsl_core::{
    ExternalParameters, Output, Parameter, PropertyValue, Resource, Template, TemplateBuilder,
    TemplateError,
};
use tracing::debug;

pub const QUEUE_RESOURCE_TYPE: &str = "AWS::SQS::Queue";

/// Delivery delay applied when the external set does not carry one
pub const DEFAULT_DELAY_SECONDS: i64 = 5;

/// Build the queue template from the external parameter set.
///
/// The external set is copied into a local mapping and left untouched;
/// the `delay` entry falls back to [`DEFAULT_DELAY_SECONDS`] when absent,
/// null or `false`. A deliberate `0` is honored.
pub fn queue_template(external: &ExternalParameters) -> Result<Template, TemplateError> {
    let mut params = external.clone();
    let delay = params.set_default("delay", DEFAULT_DELAY_SECONDS).clone();
    debug!(delay = ?delay, "Resolved queue delay");

    TemplateBuilder::new()
        .parameter("Queuename", Parameter::string())?
        .resource(
            "queue",
            Resource::new(QUEUE_RESOURCE_TYPE)
                .with_property("QueueName", PropertyValue::reference("Queuename"))
                .with_property("DelaySeconds", delay),
        )?
        .output(
            "Queue",
            Output::new(PropertyValue::reference("queue")).with_export("Queue"),
        )?
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compiled(external: &ExternalParameters) -> serde_json::Value {
        serde_json::to_value(queue_template(external).unwrap()).unwrap()
    }

    #[test]
    fn test_missing_delay_defaults_to_five() {
        let value = compiled(&ExternalParameters::new());
        assert_eq!(
            value.pointer("/Resources/queue/Properties/DelaySeconds"),
            Some(&json!(5))
        );
    }

    #[test]
    fn test_supplied_delay_is_kept() {
        let mut external = ExternalParameters::new();
        external.insert("delay", 10);
        let value = compiled(&external);
        assert_eq!(
            value.pointer("/Resources/queue/Properties/DelaySeconds"),
            Some(&json!(10))
        );
    }

    #[test]
    fn test_zero_delay_is_kept() {
        // 0 is a deliberate value, not an absent one.
        let mut external = ExternalParameters::new();
        external.insert("delay", 0);
        let value = compiled(&external);
        assert_eq!(
            value.pointer("/Resources/queue/Properties/DelaySeconds"),
            Some(&json!(0))
        );
    }

    #[test]
    fn test_null_and_false_delay_fall_back() {
        let mut external = ExternalParameters::new();
        external.insert("delay", stackdsl_core::ParamValue::Null);
        assert_eq!(
            compiled(&external).pointer("/Resources/queue/Properties/DelaySeconds"),
            Some(&json!(5))
        );

        external.insert("delay", false);
        assert_eq!(
            compiled(&external).pointer("/Resources/queue/Properties/DelaySeconds"),
            Some(&json!(5))
        );
    }

    #[test]
    fn test_queue_name_is_bound_to_parameter() {
        let value = compiled(&ExternalParameters::new());
        assert_eq!(
            value.pointer("/Parameters/Queuename/Type"),
            Some(&json!("String"))
        );
        assert_eq!(
            value.pointer("/Resources/queue/Properties/QueueName"),
            Some(&json!({ "Ref": "Queuename" }))
        );
        assert_eq!(
            value.pointer("/Resources/queue/Type"),
            Some(&json!("AWS::SQS::Queue"))
        );
    }

    #[test]
    fn test_output_exports_queue_reference() {
        let value = compiled(&ExternalParameters::new());
        assert_eq!(
            value.pointer("/Outputs/Queue/Value"),
            Some(&json!({ "Ref": "queue" }))
        );
        assert_eq!(
            value.pointer("/Outputs/Queue/Export/Name"),
            Some(&json!("Queue"))
        );
    }

    #[test]
    fn test_fragment_shape_is_fixed() {
        // Unrelated external entries never add declarations.
        let mut external = ExternalParameters::new();
        external.insert("delay", 30);
        external.insert("unrelated", "value");
        external.insert(42, true);

        let template = queue_template(&external).unwrap();
        assert_eq!(template.parameters().len(), 1);
        assert_eq!(template.resources().len(), 1);
        assert_eq!(template.outputs().len(), 1);
    }
}
