//! Panel Registry - central registration of all panel providers.
//!
//! When adding a new panel:
//! 1. Create the provider file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_panel_providers()`

use indexmap::IndexMap;
use tracing::info;

use super::definitions::{AdminPanelProvider, CustomPanelProvider};
use super::error::PanelError;
use super::panel::Panel;

/// Configures one panel.
pub trait PanelProvider: Send + Sync {
    /// Configure `panel`, which starts out empty.
    fn panel(&self, panel: Panel) -> Panel;
}

/// Every registered panel provider.
///
/// This is the central place where all panels are registered.
pub fn get_all_panel_providers() -> Vec<Box<dyn PanelProvider>> {
    vec![Box::new(AdminPanelProvider), Box::new(CustomPanelProvider)]
}

/// Panels keyed by id, in registration order.
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    panels: IndexMap<String, Panel>,
}

impl PanelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of every provider in `providers`.
    pub fn from_providers(providers: &[Box<dyn PanelProvider>]) -> Result<Self, PanelError> {
        let mut registry = Self::new();
        for provider in providers {
            registry.register(provider.as_ref())?;
        }
        Ok(registry)
    }

    /// Build and add the panel configured by `provider`.
    pub fn register(&mut self, provider: &dyn PanelProvider) -> Result<(), PanelError> {
        let panel = provider.panel(Panel::new());
        let id = panel.get_id().to_string();
        if self.panels.contains_key(&id) {
            return Err(PanelError::DuplicatePanel(id));
        }

        info!("Registering panel '{}'", id);
        self.panels.insert(id, panel);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Panel> {
        self.panels.get(id)
    }

    /// The panel marked default, else the first registered.
    pub fn default_panel(&self) -> Option<&Panel> {
        self.panels
            .values()
            .find(|panel| panel.is_default())
            .or_else(|| self.panels.values().next())
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.values()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
