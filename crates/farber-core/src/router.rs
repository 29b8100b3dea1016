//! Section registry and navigation
//!
//! The router owns every module, the sidebar and the shared content
//! container. Navigating clears the container and lets the target module
//! render into it; interactions go to whichever module is current.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{error, info};

use crate::module::{Effect, Interaction, Module};
use crate::notify::Notifier;
use crate::view::Container;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Module not found: {0}")]
    UnknownSection(String),
}

/// One sidebar link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub section: &'static str,
    pub label: &'static str,
    pub active: bool,
}

pub struct Router {
    modules: BTreeMap<&'static str, Box<dyn Module>>,
    sidebar: Vec<SidebarEntry>,
    current: String,
    container: Container,
}

impl Router {
    /// Register `modules`, in sidebar order, with `initial` as the section
    /// [`start`](Self::start) opens
    pub fn new(modules: Vec<Box<dyn Module>>, initial: impl Into<String>) -> Self {
        let mut registry = BTreeMap::new();
        let mut sidebar = Vec::with_capacity(modules.len());
        for module in modules {
            sidebar.push(SidebarEntry {
                section: module.section(),
                label: module.label(),
                active: false,
            });
            registry.insert(module.section(), module);
        }

        Self {
            modules: registry,
            sidebar,
            current: initial.into(),
            container: Container::new(),
        }
    }

    /// Render the initial section
    pub fn start(&mut self) -> Result<(), NavigationError> {
        let initial = self.current.clone();
        self.navigate_to(&initial)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.modules.contains_key(section)
    }

    pub fn current_section(&self) -> &str {
        &self.current
    }

    pub fn sidebar(&self) -> &[SidebarEntry] {
        &self.sidebar
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Switch to `section`
    ///
    /// An unknown section is logged and changes nothing: the current
    /// section, sidebar and container stay as they were.
    pub fn navigate_to(&mut self, section: &str) -> Result<(), NavigationError> {
        let Some(module) = self.modules.get_mut(section) else {
            error!(section, "Module not found");
            return Err(NavigationError::UnknownSection(section.to_string()));
        };

        self.current = section.to_string();
        for entry in &mut self.sidebar {
            entry.active = entry.section == section;
        }

        self.container.clear();
        module.render(&mut self.container);
        module.init();

        info!(section, "Navigated");
        Ok(())
    }

    /// Hand an interaction to the current module
    pub fn dispatch(&mut self, interaction: Interaction, notifier: &mut dyn Notifier) -> Effect {
        match self.modules.get_mut(self.current.as_str()) {
            Some(module) => module.handle(interaction, &mut self.container, notifier),
            None => {
                error!(section = %self.current, "No module to handle interaction");
                Effect::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Toasts;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Module that counts its lifecycle calls
    struct Probe {
        section: &'static str,
        renders: Rc<Cell<u32>>,
        inits: Rc<Cell<u32>>,
    }

    impl Module for Probe {
        fn section(&self) -> &'static str {
            self.section
        }

        fn label(&self) -> &'static str {
            self.section
        }

        fn render(&mut self, container: &mut Container) {
            self.renders.set(self.renders.get() + 1);
            container.set_title(self.section);
        }

        fn init(&mut self) {
            // init always follows render
            assert_eq!(self.inits.get() + 1, self.renders.get());
            self.inits.set(self.inits.get() + 1);
        }

        fn handle(
            &mut self,
            _interaction: Interaction,
            container: &mut Container,
            _notifier: &mut dyn Notifier,
        ) -> Effect {
            container.push_card(format!("handled by {}", self.section));
            Effect::None
        }
    }

    fn counting_module(section: &'static str) -> (Box<dyn Module>, Rc<Cell<u32>>) {
        let renders = Rc::new(Cell::new(0));
        let module = Probe {
            section,
            renders: renders.clone(),
            inits: Rc::new(Cell::new(0)),
        };
        (Box::new(module), renders)
    }

    fn router() -> (Router, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let (dashboard, dashboard_renders) = counting_module("dashboard");
        let (clients, clients_renders) = counting_module("clients");
        let router = Router::new(vec![dashboard, clients], "dashboard");
        (router, dashboard_renders, clients_renders)
    }

    #[test]
    fn test_start_renders_initial_section() {
        let (mut router, dashboard_renders, _) = router();
        router.start().unwrap();

        assert_eq!(router.current_section(), "dashboard");
        assert_eq!(router.container().title(), "dashboard");
        assert_eq!(dashboard_renders.get(), 1);

        let active: Vec<_> = router
            .sidebar()
            .iter()
            .filter(|e| e.active)
            .map(|e| e.section)
            .collect();
        assert_eq!(active, vec!["dashboard"]);
    }

    #[test]
    fn test_navigate_toggles_sidebar_and_replaces_content() {
        let (mut router, _, clients_renders) = router();
        router.start().unwrap();
        router.container_mut().push_card("stale");

        router.navigate_to("clients").unwrap();

        assert_eq!(router.current_section(), "clients");
        assert_eq!(clients_renders.get(), 1);
        assert_eq!(router.container().title(), "clients");
        assert!(router.container().cards().is_empty());
        let flags: Vec<_> = router.sidebar().iter().map(|e| e.active).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_unknown_section_changes_nothing() {
        let (mut router, dashboard_renders, _) = router();
        router.start().unwrap();
        let before = router.container().clone();
        let sidebar_before = router.sidebar().to_vec();

        let err = router.navigate_to("nope").unwrap_err();

        assert_eq!(err, NavigationError::UnknownSection("nope".to_string()));
        assert_eq!(router.current_section(), "dashboard");
        assert_eq!(router.container(), &before);
        assert_eq!(router.sidebar(), sidebar_before.as_slice());
        assert_eq!(dashboard_renders.get(), 1);
    }

    #[test]
    fn test_navigating_to_current_rerenders() {
        let (mut router, dashboard_renders, _) = router();
        router.start().unwrap();
        router.navigate_to("dashboard").unwrap();
        assert_eq!(dashboard_renders.get(), 2);
    }

    #[test]
    fn test_dispatch_goes_to_current_module() {
        let (mut router, _, _) = router();
        let mut toasts = Toasts::new();
        router.start().unwrap();
        router.navigate_to("clients").unwrap();

        let effect = router.dispatch(Interaction::ResetForm, &mut toasts);
        assert_eq!(effect, Effect::None);
        assert_eq!(
            router.container().cards().to_vec(),
            vec!["handled by clients".to_string()]
        );
    }
}
