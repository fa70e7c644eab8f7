//! # Notifications
//!
//! Contracts the save pipeline reports through: a toast-style sink and a
//! refresh signal telling the host its view of the post is stale.

use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn saved() -> Self {
        Self {
            title: String::new(),
            description: "Your journal has been saved.".to_string(),
            variant: Variant::Default,
        }
    }

    pub fn save_failed() -> Self {
        Self {
            title: "Something went wrong.".to_string(),
            description: "Your journal was not saved. Please try again.".to_string(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// Where user-visible save outcomes go
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Sink that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            Variant::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
    }
}

/// "Your copy is stale" signal, sent after a successful save
pub trait ViewRefresher: Send + Sync {
    fn refresh(&self);
}

impl<F: Fn() + Send + Sync> ViewRefresher for F {
    fn refresh(&self) {
        self()
    }
}
