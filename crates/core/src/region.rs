//! Cart display region.

use std::sync::{Arc, PoisonError, RwLock};

/// Addressable container holding the cart rendering.
///
/// The page owns the container; the handler only swaps its inner HTML.
pub trait CartRegion {
    /// Replace the full inner content with `html`.
    fn replace_contents(&self, html: &str);

    /// Current inner content.
    fn contents(&self) -> String;
}

/// Cart region shared across tasks.
pub type SharedRegion = Arc<dyn CartRegion + Send + Sync>;

/// In-memory region for headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegion {
    html: Arc<RwLock<String>>,
}

impl MemoryRegion {
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            html: Arc::new(RwLock::new(initial.into())),
        }
    }
}

impl CartRegion for MemoryRegion {
    fn replace_contents(&self, html: &str) {
        let mut current = self.html.write().unwrap_or_else(PoisonError::into_inner);

        html.clone_into(&mut *current);
    }

    fn contents(&self) -> String {
        self.html
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_swaps_whole_contents() {
        let region = MemoryRegion::new("<tr>item-42 x2</tr><tr>item-7 x1</tr>");

        region.replace_contents("<tr>item-42 x5</tr>");

        assert_eq!(region.contents(), "<tr>item-42 x5</tr>");
    }

    #[test]
    fn clones_share_contents() {
        let region = MemoryRegion::default();
        let view = region.clone();

        region.replace_contents("<table></table>");

        assert_eq!(view.contents(), "<table></table>");
    }
}
