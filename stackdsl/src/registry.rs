//! Blueprint registry
//!
//! Maps blueprint names to their builder functions. Blueprints are
//! compiled-in Rust functions; selecting one by name is the CLI's
//! counterpart to pointing a template compiler at a source file.

use stackdsl_core::{ExternalParameters, Template, TemplateError};

pub type BlueprintFn = fn(&ExternalParameters) -> Result<Template, TemplateError>;

const BLUEPRINTS: &[(&str, BlueprintFn)] = &[("queue", stackdsl_sqs::queue_template)];

pub fn lookup(name: &str) -> Option<BlueprintFn> {
    BLUEPRINTS
        .iter()
        .find(|(blueprint, _)| *blueprint == name)
        .map(|(_, build)| *build)
}

pub fn names() -> Vec<&'static str> {
    BLUEPRINTS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_blueprint() {
        let build = lookup("queue").expect("queue blueprint is registered");
        let template = build(&ExternalParameters::new()).unwrap();
        assert_eq!(
            template.resources()["queue"].resource_type(),
            "AWS::SQS::Queue"
        );
    }

    #[test]
    fn test_lookup_unknown_blueprint() {
        assert!(lookup("topic").is_none());
    }

    #[test]
    fn test_names_lists_registered_blueprints() {
        assert_eq!(names(), vec!["queue"]);
    }
}
