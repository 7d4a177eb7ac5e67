//! Event type view for the external authorization engine.
//!
//! Pure data translation: the policy engine asks which attributes an
//! operation requires and decides on its own.

use std::collections::HashMap;

use serde::Deserialize;

/// Operations an authorization policy can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Write,
    Admin,
    View,
}

/// One required attribute, e.g. `{data_type: "team", value: "checkout"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct AuthorizationAttribute {
    pub data_type: String,
    pub value: String,
}

/// Something an authorization engine can evaluate.
pub trait Resource {
    fn name(&self) -> &str;

    fn resource_type(&self) -> &str;

    /// Attributes required for `operation`, in declaration order.
    ///
    /// `None` means no policy was declared for the operation.
    fn attributes_for_operation(&self, operation: Operation) -> Option<&[AuthorizationAttribute]>;
}

/// An event type's authorization requirements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventTypeResource {
    name: String,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    attributes: HashMap<Operation, Vec<AuthorizationAttribute>>,
}

impl EventTypeResource {
    pub fn new(
        name: impl Into<String>,
        resource_type: impl Into<String>,
        attributes: HashMap<Operation, Vec<AuthorizationAttribute>>,
    ) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            attributes,
        }
    }
}

impl Resource for EventTypeResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn attributes_for_operation(&self, operation: Operation) -> Option<&[AuthorizationAttribute]> {
        self.attributes.get(&operation).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(data_type: &str, value: &str) -> AuthorizationAttribute {
        AuthorizationAttribute {
            data_type: data_type.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_attributes_for_declared_operation() {
        let resource = EventTypeResource::new(
            "order.created",
            "event-type",
            HashMap::from([(Operation::Read, vec![attr("team", "checkout"), attr("user", "*")])]),
        );

        let attrs = resource.attributes_for_operation(Operation::Read).unwrap();
        assert_eq!(attrs, &[attr("team", "checkout"), attr("user", "*")]);
        assert_eq!(resource.name(), "order.created");
        assert_eq!(resource.resource_type(), "event-type");
    }

    #[test]
    fn test_undeclared_operation_is_none() {
        let resource = EventTypeResource::new("order.created", "event-type", HashMap::new());

        assert!(resource.attributes_for_operation(Operation::Write).is_none());
    }

    #[test]
    fn test_empty_list_is_distinct_from_missing() {
        let resource = EventTypeResource::new(
            "order.created",
            "event-type",
            HashMap::from([(Operation::Admin, vec![])]),
        );

        assert_eq!(resource.attributes_for_operation(Operation::Admin), Some(&[][..]));
        assert!(resource.attributes_for_operation(Operation::View).is_none());
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = r#"
name: order.created
type: event-type
attributes:
  write:
    - data_type: service
      value: order-service
"#;
        let resource: EventTypeResource = serde_yaml::from_str(yaml).unwrap();

        let attrs = resource.attributes_for_operation(Operation::Write).unwrap();
        assert_eq!(attrs, &[attr("service", "order-service")]);
    }
}
