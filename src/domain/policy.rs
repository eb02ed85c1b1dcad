//! Role policy
//!
//! Every role-dependent decision (which home tabs exist, who may publish
//! what, who may rate whom, which rows a feed is scoped to) is answered
//! here and nowhere else. All functions are pure and total over `Role`;
//! `Role::Unrecognized` is granted nothing.

use serde::Serialize;
use uuid::Uuid;

use super::users::{Role, UserProfile};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TabKind {
    Services,
    Requests,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TabPurpose {
    /// Look at what other users publish
    Browse,
    /// Look after what the viewer publishes
    Manage,
    Both,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Tab {
    pub kind: TabKind,
    pub purpose: TabPurpose,
    pub label: &'static str,
}

const fn tab(kind: TabKind, purpose: TabPurpose, label: &'static str) -> Tab {
    Tab {
        kind,
        purpose,
        label,
    }
}

/// Home tabs, in display order
pub fn visible_tabs(role: Role) -> Vec<Tab> {
    match role {
        Role::Producer => vec![
            tab(TabKind::Services, TabPurpose::Browse, "Servicios"),
            tab(TabKind::Requests, TabPurpose::Manage, "Mis Solicitudes"),
        ],
        Role::Contractor => vec![
            tab(TabKind::Requests, TabPurpose::Browse, "Solicitudes"),
            tab(TabKind::Services, TabPurpose::Manage, "Mis Servicios"),
        ],
        Role::Both => vec![
            tab(TabKind::Services, TabPurpose::Both, "Servicios"),
            tab(TabKind::Requests, TabPurpose::Both, "Solicitudes"),
        ],
        Role::Unrecognized => Vec::new(),
    }
}

fn acts_as_producer(role: Role) -> bool {
    matches!(role, Role::Producer | Role::Both)
}

fn acts_as_contractor(role: Role) -> bool {
    matches!(role, Role::Contractor | Role::Both)
}

pub fn can_create_service(role: Role) -> bool {
    acts_as_contractor(role)
}

pub fn can_create_request(role: Role) -> bool {
    acts_as_producer(role)
}

/// Lots only make sense for people who post requests
pub fn can_manage_lots(role: Role) -> bool {
    acts_as_producer(role)
}

/// A user may rate another user when they are different people and their
/// roles are complementary: a producer rates a contractor and vice versa.
/// `Both` can stand on either side.
pub fn can_rate(viewer_role: Role, subject_role: Role, viewer_id: Uuid, subject_id: Uuid) -> bool {
    if viewer_id == subject_id {
        return false;
    }

    (acts_as_producer(viewer_role) && acts_as_contractor(subject_role))
        || (acts_as_contractor(viewer_role) && acts_as_producer(subject_role))
}

/// Reason shown when a rating is refused
pub fn rate_denial_reason(viewer_role: Role, subject_role: Role, same_user: bool) -> &'static str {
    if same_user {
        "No podés calificarte a vos mismo"
    } else if acts_as_contractor(subject_role) && !acts_as_producer(viewer_role) {
        "Solo los productores pueden calificar contratistas"
    } else if acts_as_producer(subject_role) && !acts_as_contractor(viewer_role) {
        "Solo los contratistas pueden calificar productores"
    } else {
        "No podés calificar a este usuario"
    }
}

/// Which rows a feed may load for a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Only listings the viewer owns, any status
    Own(Uuid),
    /// Every listing currently open to the public
    AllOpen,
    /// Nothing
    Empty,
}

/// Contractors and `Both` manage their own services; producers browse all
/// active ones.
pub fn services_scope(viewer: &UserProfile) -> FeedScope {
    match viewer.role {
        Role::Contractor | Role::Both => FeedScope::Own(viewer.id),
        Role::Producer => FeedScope::AllOpen,
        Role::Unrecognized => FeedScope::Empty,
    }
}

/// Producers and `Both` manage their own requests; contractors browse all
/// pending ones.
pub fn requests_scope(viewer: &UserProfile) -> FeedScope {
    match viewer.role {
        Role::Producer | Role::Both => FeedScope::Own(viewer.id),
        Role::Contractor => FeedScope::AllOpen,
        Role::Unrecognized => FeedScope::Empty,
    }
}

pub fn is_owner(viewer_id: Uuid, owner_id: Uuid) -> bool {
    viewer_id == owner_id
}

/// How a single listing looks to a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingAccess {
    /// The viewer published it; every status is visible and editable
    Owner,
    /// Open to everyone, read-only for non-owners
    Public,
    /// Not open and not the viewer's: indistinguishable from a missing row
    Hidden,
}

pub fn listing_access(viewer_id: Uuid, owner_id: Uuid, is_open: bool) -> ListingAccess {
    if is_owner(viewer_id, owner_id) {
        ListingAccess::Owner
    } else if is_open {
        ListingAccess::Public
    } else {
        ListingAccess::Hidden
    }
}

/// Everything a front end needs to lay out the home page for a role
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Capabilities {
    pub tabs: Vec<Tab>,
    pub can_create_service: bool,
    pub can_create_request: bool,
    pub can_manage_lots: bool,
}

impl Capabilities {
    pub fn for_role(role: Role) -> Self {
        Self {
            tabs: visible_tabs(role),
            can_create_service: can_create_service(role),
            can_create_request: can_create_request(role),
            can_manage_lots: can_manage_lots(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const ROLES: [Role; 4] = [Role::Producer, Role::Contractor, Role::Both, Role::Unrecognized];

    fn kinds(role: Role) -> Vec<(TabKind, TabPurpose)> {
        visible_tabs(role)
            .into_iter()
            .map(|t| (t.kind, t.purpose))
            .collect()
    }

    fn viewer(role: Role) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: Some("Viewer".to_string()),
            role,
            base_location: None,
            phone: None,
            avatar_url: None,
            reputation_avg: 0.0,
            reputation_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_tab_table() {
        assert_eq!(
            kinds(Role::Producer),
            vec![
                (TabKind::Services, TabPurpose::Browse),
                (TabKind::Requests, TabPurpose::Manage)
            ]
        );
        assert_eq!(
            kinds(Role::Contractor),
            vec![
                (TabKind::Requests, TabPurpose::Browse),
                (TabKind::Services, TabPurpose::Manage)
            ]
        );
        assert_eq!(
            kinds(Role::Both),
            vec![
                (TabKind::Services, TabPurpose::Both),
                (TabKind::Requests, TabPurpose::Both)
            ]
        );
        assert!(kinds(Role::Unrecognized).is_empty());
    }

    #[test]
    fn test_create_permissions() {
        assert!(can_create_service(Role::Contractor));
        assert!(can_create_service(Role::Both));
        assert!(!can_create_service(Role::Producer));
        assert!(!can_create_service(Role::Unrecognized));

        assert!(can_create_request(Role::Producer));
        assert!(can_create_request(Role::Both));
        assert!(!can_create_request(Role::Contractor));
        assert!(!can_create_request(Role::Unrecognized));
    }

    #[test]
    fn test_cannot_rate_self_for_any_roles() {
        let id = Uuid::new_v4();
        for viewer in ROLES {
            for subject in ROLES {
                assert!(!can_rate(viewer, subject, id, id), "{viewer:?} -> {subject:?}");
            }
        }
    }

    #[test]
    fn test_complementary_roles_can_rate() {
        let (v, s) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(can_rate(Role::Producer, Role::Contractor, v, s));
        assert!(can_rate(Role::Contractor, Role::Producer, v, s));
        assert!(can_rate(Role::Both, Role::Producer, v, s));
        assert!(can_rate(Role::Both, Role::Contractor, v, s));
        assert!(can_rate(Role::Producer, Role::Both, v, s));
        assert!(can_rate(Role::Both, Role::Both, v, s));
    }

    #[test]
    fn test_same_side_roles_cannot_rate() {
        let (v, s) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(!can_rate(Role::Producer, Role::Producer, v, s));
        assert!(!can_rate(Role::Contractor, Role::Contractor, v, s));
    }

    #[test]
    fn test_unrecognized_roles_grant_nothing() {
        let (v, s) = (Uuid::new_v4(), Uuid::new_v4());
        for other in ROLES {
            assert!(!can_rate(Role::Unrecognized, other, v, s));
            assert!(!can_rate(other, Role::Unrecognized, v, s));
        }
    }

    #[test]
    fn test_denial_reasons() {
        assert_eq!(
            rate_denial_reason(Role::Contractor, Role::Contractor, false),
            "Solo los productores pueden calificar contratistas"
        );
        assert_eq!(
            rate_denial_reason(Role::Producer, Role::Producer, false),
            "Solo los contratistas pueden calificar productores"
        );
        assert_eq!(
            rate_denial_reason(Role::Both, Role::Both, true),
            "No podés calificarte a vos mismo"
        );
    }

    #[test]
    fn test_feed_scopes() {
        let producer = viewer(Role::Producer);
        assert_eq!(services_scope(&producer), FeedScope::AllOpen);
        assert_eq!(requests_scope(&producer), FeedScope::Own(producer.id));

        let contractor = viewer(Role::Contractor);
        assert_eq!(services_scope(&contractor), FeedScope::Own(contractor.id));
        assert_eq!(requests_scope(&contractor), FeedScope::AllOpen);

        let both = viewer(Role::Both);
        assert_eq!(services_scope(&both), FeedScope::Own(both.id));
        assert_eq!(requests_scope(&both), FeedScope::Own(both.id));

        let unknown = viewer(Role::Unrecognized);
        assert_eq!(services_scope(&unknown), FeedScope::Empty);
        assert_eq!(requests_scope(&unknown), FeedScope::Empty);
    }

    #[test]
    fn test_capabilities_bundle() {
        let caps = Capabilities::for_role(Role::Contractor);
        assert_eq!(caps.tabs.len(), 2);
        assert!(caps.can_create_service);
        assert!(!caps.can_create_request);
        assert!(!caps.can_manage_lots);
    }

    #[test]
    fn test_listing_access_hides_closed_listings_of_others() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert_eq!(listing_access(owner, owner, false), ListingAccess::Owner);
        assert_eq!(listing_access(owner, owner, true), ListingAccess::Owner);
        assert_eq!(listing_access(other, owner, true), ListingAccess::Public);
        assert_eq!(listing_access(other, owner, false), ListingAccess::Hidden);
    }
}
