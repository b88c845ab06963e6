//! Storage for mounted widgets.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use super::{ChatWidget, WidgetSettings};
use crate::client::ChatBackend;

/// Thread-safe map of mounted widgets.
///
/// Every landing page render mounts a new widget. A reload leaves the old one
/// behind, so idle widgets are swept periodically.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    widgets: RwLock<HashMap<String, ChatWidget>>,
    backend: Arc<dyn ChatBackend>,
    settings: WidgetSettings,
}

impl WidgetRegistry {
    /// Create an empty registry whose widgets share `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn ChatBackend>, settings: WidgetSettings) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                widgets: RwLock::new(HashMap::new()),
                backend,
                settings,
            }),
        }
    }

    /// Mount a new widget under a fresh id.
    #[must_use]
    pub fn mount(&self) -> ChatWidget {
        let id = Uuid::new_v4().to_string();
        let widget = ChatWidget::mount(
            id.clone(),
            Arc::clone(&self.inner.backend),
            self.inner.settings.clone(),
        );
        self.inner
            .widgets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), widget.clone());

        info!(name: "widget.mounted", widget_id = %id, "Widget mounted");
        widget
    }

    /// Look up a mounted widget.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ChatWidget> {
        self.inner
            .widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Remove a widget and cancel its pending work.
    pub fn unmount(&self, id: &str) -> Option<ChatWidget> {
        let removed = self
            .inner
            .widgets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if let Some(widget) = &removed {
            widget.unmount();
        }
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all mounted widgets.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.inner
            .widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Unmount widgets idle longer than `timeout`.
    ///
    /// Returns the number of widgets removed.
    pub fn sweep_idle(&self, timeout: Duration) -> usize {
        let expired: Vec<ChatWidget> = {
            let mut guard = self
                .inner
                .widgets
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let ids: Vec<String> = guard
                .iter()
                .filter(|(_, widget)| widget.is_idle_for(timeout))
                .map(|(id, _)| id.clone())
                .collect();
            ids.iter().filter_map(|id| guard.remove(id)).collect()
        };

        for widget in &expired {
            widget.unmount();
        }
        expired.len()
    }

    /// Run [`sweep_idle`](Self::sweep_idle) every `interval`.
    pub fn spawn_sweeper(&self, interval: Duration, timeout: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = registry.sweep_idle(timeout);
                if removed > 0 {
                    info!(
                        name: "widget.sweep",
                        removed,
                        remaining = registry.len(),
                        "Idle widgets unmounted"
                    );
                }
            }
        })
    }
}
