use crate::gfx::scene::ObjectId;

/// Remembers the candidate under the pointer and reports changes only
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HoverTracker {
    hovered: Option<ObjectId>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    /// Records the latest pick; returns the new value if it differs from
    /// the previous one
    pub fn update(&mut self, hit: Option<ObjectId>) -> Option<Option<ObjectId>> {
        if hit == self.hovered {
            return None;
        }
        self.hovered = hit;
        Some(hit)
    }
}
