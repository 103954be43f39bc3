//! Minimal panel with a login page and nothing else.

use crate::core::middleware::{AUTHENTICATE, DISPATCH_SERVING_PANEL, IDENTIFY_USER, TRACE_REQUESTS};
use crate::domains::panels::panel::Panel;
use crate::domains::panels::registry::PanelProvider;

/// The `custom` panel: login only, no resources or pages.
pub struct CustomPanelProvider;

impl PanelProvider for CustomPanelProvider {
    fn panel(&self, panel: Panel) -> Panel {
        panel
            .id("custom")
            .login()
            .resources([])
            .pages(Vec::<String>::new())
            .middleware([TRACE_REQUESTS, IDENTIFY_USER, DISPATCH_SERVING_PANEL])
            .auth_middleware([AUTHENTICATE])
    }
}
