//! Route table built from the caller's menu tree.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::api::AuthApi;
use crate::client::ApiClient;
use crate::error::Result;
use crate::session::{Session, SessionBound};
use crate::stores::UserProfile;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteMeta {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_hide: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_keep_alive: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_affix: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_iframe: bool,
    /// Roles allowed to see the entry. Empty means everyone.
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub component: Option<String>,
    pub redirect: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub meta: RouteMeta,
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<RouteEntry>,
}

/// Menu rows may carry `null` for any column; treat it like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RouteEntry {
    fn visible_to(&self, roles: &[String]) -> bool {
        self.meta.roles.is_empty() || self.meta.roles.iter().any(|role| roles.contains(role))
    }
}

/// Keep entries the roles may see, pruning children the same way.
fn filter_by_roles(entries: Vec<RouteEntry>, roles: &[String]) -> Vec<RouteEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.visible_to(roles))
        .map(|mut entry| {
            entry.children = filter_by_roles(std::mem::take(&mut entry.children), roles);
            entry
        })
        .collect()
}

fn collect_flat(entries: &[RouteEntry], out: &mut Vec<RouteEntry>) {
    for entry in entries {
        let mut flat = entry.clone();
        flat.children = Vec::new();
        out.push(flat);
        collect_flat(&entry.children, out);
    }
}

pub struct RouteTable {
    client: ApiClient,
    session: Session,
    routes: RwLock<Vec<RouteEntry>>,
}

impl RouteTable {
    pub fn new(client: ApiClient, session: Session) -> Arc<Self> {
        let table = Arc::new(Self {
            client,
            session: session.clone(),
            routes: RwLock::new(Vec::new()),
        });
        session.bind(table.clone());
        table
    }

    /// Fetch the menu tree and replace the table. Returns the entry count.
    pub async fn rebuild(&self, profile: &UserProfile) -> Result<usize> {
        let response = self.client.invoke(AuthApi::menus()).await?;
        let entries: Vec<RouteEntry> = response.data_as()?;
        let entries = filter_by_roles(entries, &profile.roles);

        let mut flat = Vec::new();
        collect_flat(&entries, &mut flat);
        info!(top_level = entries.len(), total = flat.len(), "Route table rebuilt");

        *self.routes.write() = entries;
        Ok(flat.len())
    }

    /// Current tree; empty while anonymous.
    pub fn routes(&self) -> Vec<RouteEntry> {
        if !self.session.is_authenticated() {
            return Vec::new();
        }
        self.routes.read().clone()
    }

    /// Depth-first list of every entry, children detached.
    pub fn flatten(&self) -> Vec<RouteEntry> {
        let mut out = Vec::new();
        collect_flat(&self.routes(), &mut out);
        out
    }

    pub fn find(&self, path: &str) -> Option<RouteEntry> {
        self.flatten().into_iter().find(|entry| entry.path == path)
    }
}

impl SessionBound for RouteTable {
    fn name(&self) -> &'static str {
        "route_table"
    }

    fn reset(&self) {
        self.routes.write().clear();
    }
}
