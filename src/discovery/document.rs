//! JSON home document generation.
//!
//! The home document advertises every registered resource to machine
//! clients: fixed paths as `href`, templated paths as `href-template`
//! plus `href-vars` mapping each variable to its parameter relation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::routing::RouteTable;

/// Content type the home document is served with.
pub const MEDIA_TYPE: &str = "application/json-home";

/// Machine-readable description of the API surface.
///
/// Resources are keyed by relation in an ordered map, so two documents
/// built from the same table serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeDocument {
    resources: BTreeMap<String, ResourceDescriptor>,
}

/// One resource in the home document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<String>,

    #[serde(rename = "href-template", skip_serializing_if = "Option::is_none")]
    href_template: Option<String>,

    #[serde(rename = "href-vars", skip_serializing_if = "BTreeMap::is_empty")]
    href_vars: BTreeMap<String, String>,
}

impl ResourceDescriptor {
    /// Fixed path with no variables.
    pub fn fixed(href: String) -> Self {
        Self {
            href: Some(href),
            href_template: None,
            href_vars: BTreeMap::new(),
        }
    }

    /// Templated path; every variable must be described.
    pub fn templated(href_template: String, href_vars: BTreeMap<String, String>) -> Self {
        Self {
            href: None,
            href_template: Some(href_template),
            href_vars,
        }
    }
}

impl HomeDocument {
    /// Derive the document from a frozen route table.
    ///
    /// `prefix` is the mount prefix the table is served under; it becomes
    /// part of every advertised path so clients can follow templates
    /// without extra knowledge.
    pub fn from_table(table: &RouteTable, prefix: &str) -> Self {
        let mut resources = BTreeMap::new();
        for entry in table.routes() {
            let path = format!("{prefix}{}", entry.template().as_str());
            let descriptor = if entry.path_vars().is_empty() {
                ResourceDescriptor::fixed(path)
            } else {
                ResourceDescriptor::templated(path, entry.path_vars().clone())
            };
            resources.insert(entry.relation().to_string(), descriptor);
        }
        Self { resources }
    }

    /// Render to the exact bytes served to clients.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn resources(&self) -> &BTreeMap<String, ResourceDescriptor> {
        &self.resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Action, ResourceSpec, RouteTableBuilder};

    fn sample_table() -> RouteTable {
        let mut builder = RouteTableBuilder::new();
        builder
            .add(ResourceSpec {
                path: "/users/{user_id}/tokens".to_string(),
                get_head: Some(Action::ListAccessTokens),
                delete: None,
                relation: "rel/user_tokens".to_string(),
                path_vars: vec![("user_id".to_string(), "param/user_id".to_string())],
            })
            .unwrap();
        builder
            .add(ResourceSpec {
                path: "/status".to_string(),
                get_head: Some(Action::GetAccessToken),
                delete: None,
                relation: "rel/status".to_string(),
                path_vars: Vec::new(),
            })
            .unwrap();
        builder.build()
    }

    #[test]
    fn fixed_paths_use_href() {
        let doc = HomeDocument::from_table(&sample_table(), "/v3");
        let rendered = doc.render().unwrap();
        assert!(rendered.contains(r#""rel/status":{"href":"/v3/status"}"#));
    }

    #[test]
    fn templated_paths_carry_variable_relations() {
        let doc = HomeDocument::from_table(&sample_table(), "/v3");
        let descriptor = &doc.resources()["rel/user_tokens"];
        assert_eq!(
            descriptor,
            &ResourceDescriptor::templated(
                "/v3/users/{user_id}/tokens".to_string(),
                BTreeMap::from([("user_id".to_string(), "param/user_id".to_string())]),
            )
        );
    }

    #[test]
    fn rendering_is_reproducible() {
        let first = HomeDocument::from_table(&sample_table(), "/v3").render().unwrap();
        let second = HomeDocument::from_table(&sample_table(), "/v3").render().unwrap();
        assert_eq!(first, second);
    }
}
