//! Navigation entries contributed by resources.

use serde::Serialize;

/// Icon used when a resource does not configure one.
pub const DEFAULT_NAVIGATION_ICON: &str = "heroicon-o-rectangle-stack";

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub label: String,
    pub group: Option<String>,
    pub icon: String,
    pub active_icon: String,
    /// Route name pattern; a trailing `*` matches any suffix.
    pub active_route_pattern: String,
    pub badge: Option<String>,
    pub badge_color: Option<String>,
    pub sort: Option<i32>,
    pub url: String,
}

impl NavigationItem {
    /// Whether the entry is highlighted while `route_name` is being served.
    pub fn is_active(&self, route_name: &str) -> bool {
        match self.active_route_pattern.strip_suffix('*') {
            Some(prefix) => route_name.starts_with(prefix),
            None => route_name == self.active_route_pattern,
        }
    }
}

/// Entries sharing a group label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationGroup {
    pub label: Option<String>,
    pub items: Vec<NavigationItem>,
}

/// Group items by label, keeping the first-seen group order, and sort each
/// group by `sort` (unsorted entries last) then label.
pub fn group_navigation_items(items: Vec<NavigationItem>) -> Vec<NavigationGroup> {
    let mut groups: Vec<NavigationGroup> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|group| group.label == item.group) {
            Some(group) => group.items.push(item),
            None => groups.push(NavigationGroup {
                label: item.group.clone(),
                items: vec![item],
            }),
        }
    }

    for group in &mut groups {
        group
            .items
            .sort_by(|a, b| (a.sort.is_none(), a.sort, &a.label).cmp(&(b.sort.is_none(), b.sort, &b.label)));
    }
    groups
}
