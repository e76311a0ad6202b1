//! The signed-in user and the permissions attached to them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capability name to granted flag, e.g. `{"read": true, "update": false}`.
pub type Capabilities = BTreeMap<String, bool>;

/// Capabilities keyed by the resource slice they apply to
/// (`content`, `metadata`, `library_versions`, ...).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Permissions(pub BTreeMap<String, Capabilities>);

impl Permissions {
    pub fn slice(&self, name: &str) -> Option<&Capabilities> {
        self.0.get(name)
    }

    /// Grant or revoke one capability, creating the slice if needed.
    pub fn set(&mut self, slice: &str, capability: &str, granted: bool) -> &mut Self {
        self.0
            .entry(slice.to_string())
            .or_default()
            .insert(capability.to_string(), granted);
        self
    }
}

pub const ADMIN_GROUP: &str = "Admin";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct User {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub permissions: Permissions,
}

impl User {
    /// The anonymous user has no username.
    pub fn is_authenticated(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.groups.iter().any(|g| g == ADMIN_GROUP)
    }
}
