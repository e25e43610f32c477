//! Discovery relation construction.
//!
//! Relations are namespaced URI-like identifiers consumed by machine
//! clients reading the home document. They are pure values: the same
//! inputs always yield the same string, across calls and across process
//! restarts, so discovery documents are reproducible byte for byte.

/// Base under which every relation is namespaced.
///
/// Changing this breaks every deployed client; treat it as frozen.
pub const RELATION_BASE: &str = "https://docs.token-delegation.dev/api/identity/3";

/// Builds relations scoped to one API extension.
#[derive(Debug, Clone)]
pub struct RelationBuilder {
    extension_name: String,
    extension_version: String,
}

impl RelationBuilder {
    pub fn new(extension_name: &str, extension_version: &str) -> Self {
        Self {
            extension_name: extension_name.to_string(),
            extension_version: extension_version.to_string(),
        }
    }

    /// Relation for a resource exposed by this extension.
    pub fn resource(&self, resource_name: &str) -> String {
        format!(
            "{RELATION_BASE}/ext/{}/{}/rel/{resource_name}",
            self.extension_name, self.extension_version
        )
    }

    /// Relation for a path parameter introduced by this extension.
    pub fn parameter(&self, parameter_name: &str) -> String {
        format!(
            "{RELATION_BASE}/ext/{}/{}/param/{parameter_name}",
            self.extension_name, self.extension_version
        )
    }
}

/// Shared catalog of parameter relations for identifiers that belong to
/// the core identity API rather than to any extension.
pub struct Parameters;

impl Parameters {
    pub fn user_id() -> String {
        core_parameter("user_id")
    }

    pub fn role_id() -> String {
        core_parameter("role_id")
    }
}

fn core_parameter(parameter_name: &str) -> String {
    format!("{RELATION_BASE}/param/{parameter_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_relations_are_deterministic() {
        let builder = RelationBuilder::new("OS-OAUTH1", "1.0");
        let first = builder.resource("user_access_token_role");
        let second = builder.resource("user_access_token_role");
        assert_eq!(first, second);
        assert_eq!(
            first,
            "https://docs.token-delegation.dev/api/identity/3/ext/OS-OAUTH1/1.0/rel/user_access_token_role"
        );
    }

    #[test]
    fn parameter_relations_are_namespaced_per_extension() {
        let builder = RelationBuilder::new("OS-OAUTH1", "1.0");
        assert_eq!(
            builder.parameter("access_token_id"),
            "https://docs.token-delegation.dev/api/identity/3/ext/OS-OAUTH1/1.0/param/access_token_id"
        );
    }

    #[test]
    fn core_parameters_carry_no_extension_segment() {
        assert_eq!(
            Parameters::user_id(),
            "https://docs.token-delegation.dev/api/identity/3/param/user_id"
        );
        assert_eq!(
            Parameters::role_id(),
            "https://docs.token-delegation.dev/api/identity/3/param/role_id"
        );
    }
}
