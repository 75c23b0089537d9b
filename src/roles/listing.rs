//! Role and group list presentation
//!
//! Turns directory roles into list rows (domain label, avatar letter,
//! relative creation time, action paths) and picks the placeholder shown
//! when there is nothing to list.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::models::{Role, RoleKind};

/// Prefix of roles created for applications
pub const APPLICATION_DOMAIN: &str = "Application/";
/// Prefix of built-in internal roles
pub const INTERNAL_DOMAIN: &str = "Internal/";

pub const ROLE_VIEW_PATH: &str = "/roles/";
pub const GROUP_VIEW_PATH: &str = "/groups/";

/// Tag shown before a role or group name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "kebab-case")]
pub enum HeaderLabel {
    /// Group from a secondary user store, labelled with the store name
    UserStore(String),
    /// Group from the primary user store
    Primary,
    Application,
    Internal,
}

impl HeaderLabel {
    pub fn text(&self) -> &str {
        match self {
            HeaderLabel::UserStore(domain) => domain,
            HeaderLabel::Primary => "Primary",
            HeaderLabel::Application => "Application",
            HeaderLabel::Internal => "Internal",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            HeaderLabel::UserStore(_) => "group-label",
            HeaderLabel::Primary => "primary-label",
            HeaderLabel::Application => "application-label",
            HeaderLabel::Internal => "internal-label",
        }
    }
}

/// Row header: optional label plus the name without its domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListHeader {
    pub label: Option<HeaderLabel>,
    pub name: String,
}

fn after_domain(display_name: &str) -> String {
    display_name
        .split('/')
        .nth(1)
        .unwrap_or(display_name)
        .to_string()
}

/// Classify a display name by the domain it carries
pub fn header_content(kind: RoleKind, display_name: &str) -> ListHeader {
    match kind {
        RoleKind::Group => match display_name.split_once('/') {
            Some((domain, _)) => ListHeader {
                label: Some(HeaderLabel::UserStore(domain.to_string())),
                name: after_domain(display_name),
            },
            None => ListHeader {
                label: Some(HeaderLabel::Primary),
                name: display_name.to_string(),
            },
        },
        RoleKind::Role if display_name.contains(APPLICATION_DOMAIN) => ListHeader {
            label: Some(HeaderLabel::Application),
            name: after_domain(display_name),
        },
        RoleKind::Role if display_name.contains(INTERNAL_DOMAIN) => ListHeader {
            label: Some(HeaderLabel::Internal),
            name: after_domain(display_name),
        },
        RoleKind::Role => ListHeader {
            label: None,
            name: display_name.to_string(),
        },
    }
}

/// Upper-cased first character of the display name
pub fn avatar_letter(display_name: &str) -> String {
    display_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}

/// Relative time such as "3 days ago"
pub fn humanize_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0) as f64;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    let phrase = if seconds < 45.0 {
        "a few seconds".to_string()
    } else if seconds < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes.round())
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours.round())
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days.round())
    } else if days < 45.0 {
        "a month".to_string()
    } else if days < 320.0 {
        format!("{} months", (days / 30.4).round())
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        format!("{} years", (days / 365.0).round())
    };

    format!("{} ago", phrase)
}

/// Humanize an RFC 3339 timestamp; unparseable input yields `None`
pub fn humanize_created(created: &str, now: DateTime<Utc>) -> Option<String> {
    DateTime::parse_from_rfc3339(created)
        .ok()
        .map(|then| humanize_since(then.with_timezone(&Utc), now))
}

/// Path of the edit view for a role or group
pub fn edit_path(kind: RoleKind, id: &str) -> String {
    match kind {
        RoleKind::Role => format!("{}{}", ROLE_VIEW_PATH, id),
        RoleKind::Group => format!("{}{}", GROUP_VIEW_PATH, id),
    }
}

/// One rendered list row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListItem {
    pub id: String,
    pub display_name: String,
    pub header: ListHeader,
    pub avatar_letter: String,
    pub created: Option<String>,
    pub edit_path: String,
    pub delete_path: String,
}

impl RoleListItem {
    pub fn new(kind: RoleKind, role: &Role, now: DateTime<Utc>) -> Self {
        Self {
            id: role.id.clone(),
            display_name: role.display_name.clone(),
            header: header_content(kind, &role.display_name),
            avatar_letter: avatar_letter(&role.display_name),
            created: role
                .meta
                .created
                .as_deref()
                .and_then(|created| humanize_created(created, now)),
            edit_path: edit_path(kind, &role.id),
            delete_path: format!("{}/delete", edit_path(kind, &role.id)),
        }
    }
}

/// What to show instead of an empty list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ListPlaceholder {
    /// A search matched nothing
    NoSearchResults { query: String },
    /// Nothing exists yet
    Empty { kind: RoleKind },
}

impl ListPlaceholder {
    pub fn title(&self) -> String {
        match self {
            ListPlaceholder::NoSearchResults { .. } => "No results found".to_string(),
            ListPlaceholder::Empty { kind } => format!("Add a new {}", kind.noun()),
        }
    }

    pub fn subtitles(&self) -> Vec<String> {
        match self {
            ListPlaceholder::NoSearchResults { query } => vec![
                format!("We couldn't find any results for {}", query),
                "Please try a different search term.".to_string(),
            ],
            ListPlaceholder::Empty { kind } => vec![
                format!("There are currently no {} available.", kind.plural()),
                format!("You can add a new {} easily by following the", kind.noun()),
                format!("steps in the {} creation wizard.", kind.noun()),
            ],
        }
    }

    /// Text of the placeholder's call to action
    pub fn action(&self) -> String {
        match self {
            ListPlaceholder::NoSearchResults { .. } => "Clear search query".to_string(),
            ListPlaceholder::Empty { kind } => format!("New {}", kind.title()),
        }
    }
}

/// Placeholder for an empty listing; `None` when there are rows to show
pub fn placeholder(kind: RoleKind, roles: &[Role], search: Option<&str>) -> Option<ListPlaceholder> {
    if !roles.is_empty() {
        return None;
    }

    match search.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => Some(ListPlaceholder::NoSearchResults {
            query: query.to_string(),
        }),
        None => Some(ListPlaceholder::Empty { kind }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_group_headers() {
        assert_eq!(
            header_content(RoleKind::Group, "LDAP/support"),
            ListHeader {
                label: Some(HeaderLabel::UserStore("LDAP".to_string())),
                name: "support".to_string(),
            }
        );
        assert_eq!(
            header_content(RoleKind::Group, "engineering"),
            ListHeader {
                label: Some(HeaderLabel::Primary),
                name: "engineering".to_string(),
            }
        );
    }

    #[test]
    fn test_role_headers() {
        let app = header_content(RoleKind::Role, "Application/console");
        assert_eq!(app.label, Some(HeaderLabel::Application));
        assert_eq!(app.name, "console");

        let internal = header_content(RoleKind::Role, "Internal/admin");
        assert_eq!(internal.label, Some(HeaderLabel::Internal));
        assert_eq!(internal.name, "admin");
        assert_eq!(HeaderLabel::Internal.css_class(), "internal-label");

        let plain = header_content(RoleKind::Role, "auditor");
        assert_eq!(plain.label, None);
        assert_eq!(plain.name, "auditor");
    }

    #[test]
    fn test_avatar_letter() {
        assert_eq!(avatar_letter("internal/admin"), "I");
        assert_eq!(avatar_letter("équipe"), "É");
        assert_eq!(avatar_letter(""), "");
    }

    #[test]
    fn test_humanize_thresholds() {
        let cases = [
            (Duration::seconds(10), "a few seconds ago"),
            (Duration::seconds(60), "a minute ago"),
            (Duration::minutes(10), "10 minutes ago"),
            (Duration::minutes(60), "an hour ago"),
            (Duration::hours(5), "5 hours ago"),
            (Duration::hours(30), "a day ago"),
            (Duration::days(3), "3 days ago"),
            (Duration::days(30), "a month ago"),
            (Duration::days(91), "3 months ago"),
            (Duration::days(400), "a year ago"),
            (Duration::days(730), "2 years ago"),
        ];
        for (elapsed, expected) in cases {
            assert_eq!(humanize_since(now() - elapsed, now()), expected);
        }
    }

    #[test]
    fn test_humanize_created_rejects_garbage() {
        assert_eq!(
            humanize_created("2021-05-29T12:00:00Z", now()).as_deref(),
            Some("3 days ago")
        );
        assert_eq!(humanize_created("yesterday", now()), None);
    }

    #[test]
    fn test_list_item_paths() {
        let role = Role::new("r1", "Internal/admin").created_at("2021-06-01T11:00:00Z");
        let item = RoleListItem::new(RoleKind::Role, &role, now());

        assert_eq!(item.edit_path, "/roles/r1");
        assert_eq!(item.delete_path, "/roles/r1/delete");
        assert_eq!(item.created.as_deref(), Some("an hour ago"));
        assert_eq!(edit_path(RoleKind::Group, "g1"), "/groups/g1");
    }

    #[test]
    fn test_placeholder_selection() {
        let roles = vec![Role::new("r1", "admin")];
        assert_eq!(placeholder(RoleKind::Role, &roles, Some("adm")), None);

        let searched = placeholder(RoleKind::Role, &[], Some("zzz")).unwrap();
        assert_eq!(searched.title(), "No results found");
        assert_eq!(
            searched.subtitles()[0],
            "We couldn't find any results for zzz"
        );
        assert_eq!(searched.action(), "Clear search query");

        let empty = placeholder(RoleKind::Group, &[], Some("   ")).unwrap();
        assert_eq!(empty, ListPlaceholder::Empty { kind: RoleKind::Group });
        assert_eq!(empty.title(), "Add a new group");
        assert_eq!(empty.action(), "New Group");
        assert_eq!(
            empty.subtitles()[0],
            "There are currently no groups available."
        );
    }
}
