//! Load-balancing view model.
//!
//! Assembles the four scalar settings (with a `"-"` placeholder when
//! absent) and passes the routes and overrides maps through unmodified.
//! Override application semantics belong to the backend; the console
//! only shows which routes are currently overridden and edits the
//! overrides map as a whole document.

use std::collections::BTreeMap;

use serde::Serialize;

use stratus_model::{ResourceSnapshot, RouteSettings};

/// Rendered in place of any load-balancer scalar the snapshot omits.
pub const SETTING_PLACEHOLDER: &str = "-";

/// The four load-balancer scalars, edited as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LbSettings {
    pub policy: String,
    pub match_header: String,
    pub host: String,
    pub port: String,
}

impl LbSettings {
    fn from_snapshot(snapshot: &ResourceSnapshot) -> Self {
        let field = |value: &Option<String>| {
            value
                .clone()
                .unwrap_or_else(|| SETTING_PLACEHOLDER.to_string())
        };
        Self {
            policy: field(&snapshot.load_balancer_policy),
            match_header: field(&snapshot.load_balancer_match_header),
            host: field(&snapshot.load_balancer_host),
            port: field(&snapshot.load_balancer_port),
        }
    }
}

/// Display/edit-ready load-balancer state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LbViewModel {
    pub settings: LbSettings,
    /// Active routes, keyed by bucket name.
    pub routes: BTreeMap<String, RouteSettings>,
    /// Per-bucket overrides, keyed by bucket name. Always sent back to
    /// the backend whole when edited.
    pub overrides: BTreeMap<String, RouteSettings>,
}

impl LbViewModel {
    pub fn assemble(snapshot: &ResourceSnapshot) -> Self {
        Self {
            settings: LbSettings::from_snapshot(snapshot),
            routes: snapshot.load_balancer_routes.clone(),
            overrides: snapshot.load_balancer_route_overrides.clone(),
        }
    }

    /// A route is overridden iff its bucket name keys the overrides map.
    pub fn is_overridden(&self, bucket_name: &str) -> bool {
        self.overrides.contains_key(bucket_name)
    }
}
