//! Registry owning every widget definition for the lifetime of a configuration.
//!
//! Definitions load one by one, then a finalize pass resolves child id
//! references into arena keys and rejects dangling ids and layout cycles.
//! After finalize the registry is read-only until [`WidgetRegistry::reset`].

use std::collections::HashMap;

use slotmap::SlotMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::widget::{Widget, WidgetConfig, WidgetLoadError, WidgetStyle};
use crate::WidgetKey;

/// Errors detectable only once all definitions are loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinalizeError {
    #[error("layout '{parent}' references unknown widget '{child}'")]
    DanglingChild { parent: String, child: String },
    #[error("layout '{id}' is part of a reference cycle")]
    LayoutCycle { id: String },
}

/// Arena of widget definitions keyed by [`WidgetKey`], with id lookup.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: SlotMap<WidgetKey, Widget>,
    by_id: HashMap<String, WidgetKey>,
    order: Vec<WidgetKey>,
    finalized: bool,
}

impl WidgetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store one configuration record.
    ///
    /// A record reusing an existing id replaces the earlier definition in
    /// place (later configuration sources override earlier ones) and keeps
    /// its key stable.
    pub fn load(&mut self, config: WidgetConfig) -> Result<WidgetKey, WidgetLoadError> {
        let widget = Widget::from_config(config)?;
        self.finalized = false;
        if let Some(&existing) = self.by_id.get(widget.id()) {
            warn!(id = %widget.id(), "widget definition overridden by a later load");
            self.widgets[existing] = widget;
            return Ok(existing);
        }
        let id = widget.id().to_string();
        let key = self.widgets.insert(widget);
        self.by_id.insert(id, key);
        self.order.push(key);
        Ok(key)
    }

    /// Load a JSON array of widget records, stopping at the first rejection.
    pub fn load_from_json(&mut self, text: &str) -> Result<usize, WidgetLoadError> {
        let configs: Vec<WidgetConfig> = serde_json::from_str(text)?;
        let count = configs.len();
        for config in configs {
            self.load(config)?;
        }
        Ok(count)
    }

    /// Resolve child references and validate the layout graph.
    ///
    /// Idempotent; must run after loading and before any rendering of
    /// layout widgets.
    pub fn finalize(&mut self) -> Result<(), FinalizeError> {
        let mut resolved: Vec<(WidgetKey, Vec<WidgetKey>)> = Vec::new();
        for (key, widget) in &self.widgets {
            if let WidgetStyle::Layout { children, .. } = widget.style() {
                let mut keys = Vec::with_capacity(children.len());
                for child in children {
                    match self.by_id.get(child.id()) {
                        Some(&child_key) => keys.push(child_key),
                        None => {
                            return Err(FinalizeError::DanglingChild {
                                parent: widget.id().to_string(),
                                child: child.id().to_string(),
                            });
                        }
                    }
                }
                resolved.push((key, keys));
            }
        }
        for (key, keys) in resolved {
            self.widgets[key].bind_children(&keys);
        }
        self.check_cycles()?;
        self.finalized = true;
        info!(widgets = self.widgets.len(), "widget registry finalized");
        Ok(())
    }

    fn check_cycles(&self) -> Result<(), FinalizeError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit(
            widgets: &SlotMap<WidgetKey, Widget>,
            marks: &mut HashMap<WidgetKey, Mark>,
            key: WidgetKey,
        ) -> Result<(), FinalizeError> {
            match marks.get(&key) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    return Err(FinalizeError::LayoutCycle {
                        id: widgets[key].id().to_string(),
                    });
                }
                None => {}
            }
            marks.insert(key, Mark::InProgress);
            if let WidgetStyle::Layout { children, .. } = widgets[key].style() {
                for child in children {
                    // Children were just bound by finalize.
                    let child_key = child.key().unwrap_or_else(|| {
                        panic!("unbound child '{}' during cycle check", child.id())
                    });
                    visit(widgets, marks, child_key)?;
                }
            }
            marks.insert(key, Mark::Done);
            Ok(())
        }

        let mut marks = HashMap::new();
        for key in self.order.iter().copied() {
            visit(&self.widgets, &mut marks, key)?;
        }
        Ok(())
    }

    /// Drop every definition, e.g. on configuration reload or test teardown.
    pub fn reset(&mut self) {
        self.widgets.clear();
        self.by_id.clear();
        self.order.clear();
        self.finalized = false;
    }

    /// Look up a definition by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Widget> {
        self.by_id.get(id).map(|&key| &self.widgets[key])
    }

    /// Look up a definition by arena key.
    #[must_use]
    pub fn widget(&self, key: WidgetKey) -> Option<&Widget> {
        self.widgets.get(key)
    }

    /// Arena key for an id, once loaded.
    #[must_use]
    pub fn key_of(&self, id: &str) -> Option<WidgetKey> {
        self.by_id.get(id).copied()
    }

    /// All definitions, in first-load order.
    pub fn get_all(&self) -> impl Iterator<Item = &Widget> {
        self.order.iter().map(|&key| &self.widgets[key])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Whether finalize has run since the last mutation.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> String {
        format!(
            r#"{{"id": "{id}", "style": "numeric", "label": "{id}", "var": "focus"}}"#
        )
    }

    fn layout(id: &str, children: &[&str]) -> String {
        let children = children
            .iter()
            .map(|child| format!(r#""{child}""#))
            .collect::<Vec<_>>()
            .join(", ");
        format!(r#"{{"id": "{id}", "style": "layout", "widgets": [{children}]}}"#)
    }

    #[test]
    fn load_finalize_and_lookup() {
        let mut registry = WidgetRegistry::new();
        let json = format!("[{}, {}, {}]", leaf("a"), leaf("b"), layout("root", &["a", "b"]));
        assert_eq!(registry.load_from_json(&json).expect("loads"), 3);
        assert!(!registry.is_finalized());
        registry.finalize().expect("finalizes");
        assert!(registry.is_finalized());
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.get_all().map(Widget::id).collect::<Vec<_>>(),
            vec!["a", "b", "root"]
        );
        let root = registry.get("root").expect("root exists");
        assert!(root.is_layout());
    }

    #[test]
    fn duplicate_id_replaces_existing_definition() {
        let mut registry = WidgetRegistry::new();
        registry
            .load_from_json(&format!("[{}]", leaf("a")))
            .expect("loads");
        let first = registry.key_of("a").expect("key");
        let replacement =
            r#"[{"id": "a", "style": "numeric", "label": "replaced", "var": "pain"}]"#;
        registry.load_from_json(replacement).expect("loads");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.key_of("a"), Some(first));
        assert_eq!(registry.get("a").expect("a").label(), "replaced");
    }

    #[test]
    fn dangling_child_is_rejected_at_finalize() {
        let mut registry = WidgetRegistry::new();
        let json = format!("[{}]", layout("root", &["ghost"]));
        registry.load_from_json(&json).expect("loads");
        assert_eq!(
            registry.finalize(),
            Err(FinalizeError::DanglingChild {
                parent: "root".to_string(),
                child: "ghost".to_string(),
            })
        );
        assert!(!registry.is_finalized());
    }

    #[test]
    fn layout_cycles_are_rejected_at_finalize() {
        let mut registry = WidgetRegistry::new();
        let json = format!(
            "[{}, {}, {}]",
            layout("a", &["b"]),
            layout("b", &["c"]),
            layout("c", &["a"])
        );
        registry.load_from_json(&json).expect("loads");
        assert!(matches!(
            registry.finalize(),
            Err(FinalizeError::LayoutCycle { .. })
        ));

        let mut direct = WidgetRegistry::new();
        direct
            .load_from_json(&format!("[{}]", layout("selfie", &["selfie"])))
            .expect("loads");
        assert_eq!(
            direct.finalize(),
            Err(FinalizeError::LayoutCycle {
                id: "selfie".to_string(),
            })
        );
    }

    #[test]
    fn reset_clears_all_state() {
        let mut registry = WidgetRegistry::new();
        registry
            .load_from_json(&format!("[{}]", leaf("a")))
            .expect("loads");
        registry.finalize().expect("finalizes");
        registry.reset();
        assert!(registry.is_empty());
        assert!(!registry.is_finalized());
        assert!(registry.get("a").is_none());
    }

    #[test]
    fn unknown_variable_names_fail_to_parse() {
        let mut registry = WidgetRegistry::new();
        let json = r#"[{"id": "x", "style": "numeric", "var": "chakra"}]"#;
        assert!(matches!(
            registry.load_from_json(json),
            Err(WidgetLoadError::Parse(_))
        ));
        assert!(registry.is_empty());
    }
}
