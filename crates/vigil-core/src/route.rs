//! Fragment routing for the two-screen dashboard.
//!
//! The URL-fragment grammar of the original surface is kept as the sole
//! routing input/output: an empty fragment is the fleet list,
//! `#bot-<id>` / `#site-<id>` is the detail screen for `<id>`. A detail
//! route whose id is absent from current state resolves back to the list
//! (fragment cleared) rather than rendering an error screen.

use crate::state::DashState;
use crate::types::{Entity, EntityId};

/// Active route of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Fleet list (empty fragment)
    #[default]
    List,
    /// Detail screen for one entity
    Detail(EntityId),
}

impl Route {
    /// Parse a fragment string into a route.
    ///
    /// Empty or non-matching fragments map to the list view.
    pub fn parse(fragment: &str) -> Self {
        for prefix in ["#bot-", "#site-"] {
            if let Some(id) = fragment.strip_prefix(prefix) {
                if !id.is_empty() {
                    return Self::Detail(id.to_string());
                }
            }
        }
        Self::List
    }

    /// Fragment string for navigating to an entity's detail screen.
    pub fn fragment_for(entity: &Entity) -> String {
        format!("{}{}", entity.kind.fragment_prefix(), entity.id)
    }

    /// Resolve this route against current state.
    ///
    /// A detail route referencing an unknown id redirects to the list.
    pub fn resolve(self, state: &DashState) -> Self {
        match self {
            Self::Detail(id) if state.entity(&id).is_none() => {
                tracing::debug!(entity_id = %id, "detail route for unknown entity, redirecting to list");
                Self::List
            }
            route => route,
        }
    }

    /// Returns true for the list view.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityKind;

    fn bot(id: &str) -> Entity {
        Entity {
            id: id.to_string(),
            kind: EntityKind::Bot,
            status: "ONLINE".into(),
            balance: Some("0.42 BNB".into()),
            level: Some(3),
            url: None,
            uptime: None,
            next_action: Some(0),
            last_checked: None,
        }
    }

    #[test]
    fn test_parse_empty_is_list() {
        assert_eq!(Route::parse(""), Route::List);
    }

    #[test]
    fn test_parse_bot_fragment() {
        assert_eq!(Route::parse("#bot-alpha"), Route::Detail("alpha".into()));
    }

    #[test]
    fn test_parse_site_fragment() {
        assert_eq!(Route::parse("#site-my-site"), Route::Detail("my-site".into()));
    }

    #[test]
    fn test_parse_unknown_fragment_is_list() {
        assert_eq!(Route::parse("#settings"), Route::List);
        assert_eq!(Route::parse("#bot-"), Route::List);
        assert_eq!(Route::parse("bot-alpha"), Route::List);
    }

    #[test]
    fn test_fragment_roundtrip() {
        let entity = bot("alpha");
        let fragment = Route::fragment_for(&entity);
        assert_eq!(fragment, "#bot-alpha");
        assert_eq!(Route::parse(&fragment), Route::Detail("alpha".into()));
    }

    #[test]
    fn test_resolve_unknown_id_redirects_to_list() {
        let state = DashState::default();
        let route = Route::parse("#bot-alpha").resolve(&state);
        assert_eq!(route, Route::List);
    }

    #[test]
    fn test_resolve_known_id_stays_on_detail() {
        let mut state = DashState::default();
        state.replace_bots([("alpha".to_string(), bot("alpha"))].into());

        let route = Route::parse("#bot-alpha").resolve(&state);
        assert_eq!(route, Route::Detail("alpha".into()));
    }
}
