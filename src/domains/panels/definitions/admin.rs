//! The demo admin panel.

use crate::core::middleware::{AUTHENTICATE, DISPATCH_SERVING_PANEL, IDENTIFY_USER, TRACE_REQUESTS};
use crate::domains::panels::panel::Panel;
use crate::domains::panels::registry::PanelProvider;
use crate::domains::resources::get_all_resources;

/// The default `admin` panel serving every discovered resource.
pub struct AdminPanelProvider;

impl PanelProvider for AdminPanelProvider {
    fn panel(&self, panel: Panel) -> Panel {
        panel
            .id("admin")
            .path("admin")
            .as_default()
            .login()
            .discover_resources(get_all_resources())
            .pages(["dashboard"])
            .middleware([TRACE_REQUESTS, IDENTIFY_USER, DISPATCH_SERVING_PANEL])
            .auth_middleware([AUTHENTICATE])
    }
}
