//! Load Observer Module
//!
//! Progress and completion notifications for a running load.

use tokio::sync::mpsc::UnboundedSender;

use crate::cache::ImageMap;

/// Receives notifications from `BatchLoader::load`.
///
/// Both methods default to no-ops. Implementations must not assume anyone
/// is still listening.
pub trait LoadObserver: Send + Sync {
    /// Fraction of cache misses resolved so far, in `[0, 1]`.
    fn on_progress(&self, _fraction: f64) {}

    /// The final mapping, delivered once per load.
    fn on_complete(&self, _images: &ImageMap) {}
}

/// Ignores every notification.
impl LoadObserver for () {}

/// Notification forwarded through a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    Progress(f64),
    Complete(ImageMap),
}

/// Forwards notifications; a dropped receiver turns sends into no-ops.
impl LoadObserver for UnboundedSender<LoadEvent> {
    fn on_progress(&self, fraction: f64) {
        let _ = self.send(LoadEvent::Progress(fraction));
    }

    fn on_complete(&self, images: &ImageMap) {
        let _ = self.send(LoadEvent::Complete(images.clone()));
    }
}
