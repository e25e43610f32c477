//! Route declarations for the delegated-authorization extension.
//!
//! The goal of this extension is to let third-party consumers act with a
//! limited subset of a user's roles. This module declares the read and
//! revocation surface over those delegations:
//!
//! ```text
//! GET    /users/{user_id}/OS-OAUTH1/access_tokens
//! GET    /users/{user_id}/OS-OAUTH1/access_tokens/{access_token_id}
//! DELETE /users/{user_id}/OS-OAUTH1/access_tokens/{access_token_id}
//! GET    /users/{user_id}/OS-OAUTH1/access_tokens/{access_token_id}/roles
//! GET    /users/{user_id}/OS-OAUTH1/access_tokens/{access_token_id}/roles/{role_id}
//! ```
//!
//! The `OS-OAUTH1` path segment is part of the public API; deployed
//! clients depend on it verbatim.

use crate::discovery::{Parameters, RelationBuilder};
use crate::routing::{Action, RegistryError, ResourceSpec, RouteTable, RouteTableBuilder};

/// Name of the extension as it appears in paths and relations.
pub const EXTENSION_NAME: &str = "OS-OAUTH1";

/// Version segment used in relation URIs.
pub const EXTENSION_VERSION: &str = "1.0";

/// Build the validated route table for the extension.
///
/// Any error here is a startup configuration fault; callers abort rather
/// than serve a partial table.
pub fn delegation_routes() -> Result<RouteTable, RegistryError> {
    let relation = RelationBuilder::new(EXTENSION_NAME, EXTENSION_VERSION);
    let access_token_id = relation.parameter("access_token_id");

    let mut table = RouteTableBuilder::new();

    table.add(ResourceSpec {
        path: "/users/{user_id}/OS-OAUTH1/access_tokens".to_string(),
        get_head: Some(Action::ListAccessTokens),
        delete: None,
        relation: relation.resource("user_access_tokens"),
        path_vars: vec![("user_id".to_string(), Parameters::user_id())],
    })?;

    table.add(ResourceSpec {
        path: "/users/{user_id}/OS-OAUTH1/access_tokens/{access_token_id}".to_string(),
        get_head: Some(Action::GetAccessToken),
        delete: Some(Action::DeleteAccessToken),
        relation: relation.resource("user_access_token"),
        path_vars: vec![
            ("user_id".to_string(), Parameters::user_id()),
            ("access_token_id".to_string(), access_token_id.clone()),
        ],
    })?;

    table.add(ResourceSpec {
        path: "/users/{user_id}/OS-OAUTH1/access_tokens/{access_token_id}/roles".to_string(),
        get_head: Some(Action::ListAccessTokenRoles),
        delete: None,
        relation: relation.resource("user_access_token_roles"),
        path_vars: vec![
            ("user_id".to_string(), Parameters::user_id()),
            ("access_token_id".to_string(), access_token_id.clone()),
        ],
    })?;

    table.add(ResourceSpec {
        path: "/users/{user_id}/OS-OAUTH1/access_tokens/{access_token_id}/roles/{role_id}"
            .to_string(),
        get_head: Some(Action::GetAccessTokenRole),
        delete: None,
        relation: relation.resource("user_access_token_role"),
        path_vars: vec![
            ("user_id".to_string(), Parameters::user_id()),
            ("access_token_id".to_string(), access_token_id),
            ("role_id".to_string(), Parameters::role_id()),
        ],
    })?;

    Ok(table.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn declares_five_operations_on_four_resources() {
        let table = delegation_routes().unwrap();
        assert_eq!(table.len(), 4);
        let actions: usize = table.routes().map(|e| e.actions().count()).sum();
        assert_eq!(actions, 5);
    }

    #[test]
    fn every_variable_has_metadata() {
        let table = delegation_routes().unwrap();
        for entry in table.routes() {
            for variable in entry.template().variables() {
                assert!(
                    entry.path_vars().contains_key(variable),
                    "variable `{variable}` of `{}` lacks metadata",
                    entry.template().as_str()
                );
            }
        }
    }

    #[test]
    fn item_route_wins_over_collection() {
        let table = delegation_routes().unwrap();
        let resolved = table
            .resolve(&Method::GET, "/users/42/OS-OAUTH1/access_tokens/99")
            .unwrap();
        assert_eq!(resolved.action, Action::GetAccessToken);
        assert_eq!(resolved.captured["user_id"], "42");
        assert_eq!(resolved.captured["access_token_id"], "99");

        let resolved = table
            .resolve(&Method::GET, "/users/42/OS-OAUTH1/access_tokens")
            .unwrap();
        assert_eq!(resolved.action, Action::ListAccessTokens);
    }

    #[test]
    fn relations_are_stable_across_builds() {
        let first = delegation_routes().unwrap();
        let second = delegation_routes().unwrap();
        let rels =
            |t: &RouteTable| t.routes().map(|e| e.relation().to_string()).collect::<Vec<_>>();
        assert_eq!(rels(&first), rels(&second));
        assert!(rels(&first).contains(
            &"https://docs.token-delegation.dev/api/identity/3/ext/OS-OAUTH1/1.0/rel/user_access_token_role"
                .to_string()
        ));
    }
}
