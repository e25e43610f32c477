//! Route table construction and lookup.
//!
//! # Responsibilities
//! - Accept route declarations (path template, actions, discovery metadata)
//! - Validate the table at construction time (fail fast on startup faults)
//! - Resolve a (method, path) pair to its action and captured variables
//!
//! # Design Decisions
//! - Every declared variable must carry parameter metadata, both ways; a
//!   dangling variable or a dangling metadata entry aborts startup
//! - Uniqueness is checked per expanded HTTP method against the structural
//!   shape of the template, so `/a/{x}` and `/a/{y}` collide
//! - Explicit `Option` results rather than silent defaults

use std::collections::{BTreeMap, HashMap};

use axum::http::Method;
use thiserror::Error;

use crate::routing::template::{PathTemplate, TemplateError};

/// Operations of the delegated-authorization API.
///
/// Handlers are bound to these variants at compile time; the table never
/// stores free-form action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListAccessTokens,
    GetAccessToken,
    DeleteAccessToken,
    ListAccessTokenRoles,
    GetAccessTokenRole,
}

impl Action {
    /// Stable identifier used in logs and metrics labels.
    pub fn name(self) -> &'static str {
        match self {
            Action::ListAccessTokens => "list_access_tokens",
            Action::GetAccessToken => "get_access_token",
            Action::DeleteAccessToken => "delete_access_token",
            Action::ListAccessTokenRoles => "list_access_token_roles",
            Action::GetAccessTokenRole => "get_access_token_role",
        }
    }

    /// The method slot this action may legally occupy in a registration.
    fn slot(self) -> Slot {
        match self {
            Action::ListAccessTokens
            | Action::GetAccessToken
            | Action::ListAccessTokenRoles
            | Action::GetAccessTokenRole => Slot::GetHead,
            Action::DeleteAccessToken => Slot::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    GetHead,
    Delete,
}

impl Slot {
    fn label(self) -> &'static str {
        match self {
            Slot::GetHead => "GET/HEAD",
            Slot::Delete => "DELETE",
        }
    }
}

/// One route declaration, as handed to [`RouteTableBuilder::add`].
///
/// Mirrors a single resource registration: one path, the read action served
/// on GET (and HEAD), an optional DELETE action, the discovery relation for
/// the resource, and the parameter relation for each path variable.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub path: String,
    pub get_head: Option<Action>,
    pub delete: Option<Action>,
    pub relation: String,
    pub path_vars: Vec<(String, String)>,
}

/// A validated, immutable route table entry.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    template: PathTemplate,
    get_head: Option<Action>,
    delete: Option<Action>,
    relation: String,
    path_vars: BTreeMap<String, String>,
}

impl RouteEntry {
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn get_head_action(&self) -> Option<Action> {
        self.get_head
    }

    pub fn delete_action(&self) -> Option<Action> {
        self.delete
    }

    /// Discovery relation identifying this resource.
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Variable name → parameter relation, ordered by name.
    pub fn path_vars(&self) -> &BTreeMap<String, String> {
        &self.path_vars
    }

    /// All actions bound on this entry.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.get_head.into_iter().chain(self.delete)
    }

    /// HTTP methods this entry answers, expanded (GET implies HEAD).
    fn methods(&self) -> Vec<Method> {
        let mut methods = Vec::new();
        if self.get_head.is_some() {
            methods.push(Method::GET);
            methods.push(Method::HEAD);
        }
        if self.delete.is_some() {
            methods.push(Method::DELETE);
        }
        methods
    }
}

/// Problems detected while building the route table.
///
/// These are startup configuration faults: the process must abort rather
/// than serve a partially-registered API.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("duplicate route: {method} {path} is already registered")]
    DuplicateRoute { method: String, path: String },

    #[error("path variable `{variable}` in `{path}` has no parameter metadata")]
    MissingVariableMetadata { path: String, variable: String },

    #[error("metadata entry `{variable}` matches no variable in `{path}`")]
    UnknownVariableMetadata { path: String, variable: String },

    #[error("metadata for `{variable}` in `{path}` is declared twice")]
    DuplicateVariableMetadata { path: String, variable: String },

    #[error("route `{path}` binds no actions")]
    NoActions { path: String },

    #[error("action `{action}` cannot occupy the {slot} slot of `{path}`")]
    ActionSlotMismatch {
        path: String,
        action: &'static str,
        slot: &'static str,
    },
}

/// Accumulates validated entries; frozen into a [`RouteTable`].
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    entries: Vec<RouteEntry>,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one resource. All structural checks happen here.
    pub fn add(&mut self, spec: ResourceSpec) -> Result<(), RegistryError> {
        let template = PathTemplate::parse(&spec.path)?;

        if spec.get_head.is_none() && spec.delete.is_none() {
            return Err(RegistryError::NoActions { path: spec.path });
        }
        if let Some(action) = spec.get_head {
            if action.slot() != Slot::GetHead {
                return Err(RegistryError::ActionSlotMismatch {
                    path: spec.path,
                    action: action.name(),
                    slot: Slot::GetHead.label(),
                });
            }
        }
        if let Some(action) = spec.delete {
            if action.slot() != Slot::Delete {
                return Err(RegistryError::ActionSlotMismatch {
                    path: spec.path,
                    action: action.name(),
                    slot: Slot::Delete.label(),
                });
            }
        }

        let mut path_vars = BTreeMap::new();
        for (variable, relation) in spec.path_vars {
            if !template.variables().any(|v| v == variable) {
                return Err(RegistryError::UnknownVariableMetadata {
                    path: spec.path,
                    variable,
                });
            }
            if path_vars.insert(variable.clone(), relation).is_some() {
                return Err(RegistryError::DuplicateVariableMetadata {
                    path: spec.path,
                    variable,
                });
            }
        }
        for variable in template.variables() {
            if !path_vars.contains_key(variable) {
                return Err(RegistryError::MissingVariableMetadata {
                    path: spec.path,
                    variable: variable.to_string(),
                });
            }
        }

        let entry = RouteEntry {
            template,
            get_head: spec.get_head,
            delete: spec.delete,
            relation: spec.relation,
            path_vars,
        };

        for existing in &self.entries {
            if !existing.template.same_shape(&entry.template) {
                continue;
            }
            for method in entry.methods() {
                if existing.methods().contains(&method) {
                    return Err(RegistryError::DuplicateRoute {
                        method: method.to_string(),
                        path: entry.template.as_str().to_string(),
                    });
                }
            }
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Freeze the table. Entries are immutable from here on.
    pub fn build(self) -> RouteTable {
        RouteTable {
            entries: self.entries,
        }
    }
}

/// The frozen route table. Safe to share across workers without locks:
/// nothing is mutated after construction.
#[derive(Debug)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

/// Result of a successful [`RouteTable::resolve`].
#[derive(Debug)]
pub struct ResolvedRoute<'a> {
    pub action: Action,
    pub entry: &'a RouteEntry,
    pub captured: HashMap<String, String>,
}

impl RouteTable {
    /// All entries, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry that binds the given action, if any.
    pub fn entry_for(&self, action: Action) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.actions().any(|a| a == action))
    }

    /// Resolve a concrete request to its action.
    ///
    /// When several templates match the path, the one with the most literal
    /// segments wins. Returns `None` for an unknown path or for a declared
    /// path whose entry does not answer the method; turning the latter into
    /// a 405 is the HTTP layer's job.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<ResolvedRoute<'_>> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let captured = entry.template.matches(path)?;
                let slot = if *method == Method::GET || *method == Method::HEAD {
                    entry.get_head
                } else if *method == Method::DELETE {
                    entry.delete
                } else {
                    None
                };
                let action = slot?;
                Some(ResolvedRoute {
                    action,
                    entry,
                    captured,
                })
            })
            .max_by_key(|resolved| resolved.entry.template.literal_count())
    }
}
