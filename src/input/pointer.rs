//! Active pointer records and the stale-pointer eviction rule.

use glam::DVec2;

use super::event::{MouseButton, PointerInput, PointerType};

/// Pointer id reserved for the synthetic pointer-lock pointer.
pub const LOCKED_POINTER_ID: i32 = -1;

/// One active pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRecord {
    /// Platform pointer id ([`LOCKED_POINTER_ID`] for the locked pointer).
    pub id: i32,
    /// Device kind.
    pub pointer_type: PointerType,
    /// Last absolute position in client pixels.
    pub position: DVec2,
    /// Last relative motion.
    pub delta: DVec2,
    /// The mouse button this pointer holds, if it is a mouse pointer.
    pub mouse_button: Option<MouseButton>,
}

impl PointerRecord {
    /// Record for a freshly pressed pointer.
    #[must_use]
    pub fn from_input(input: &PointerInput, mouse_button: Option<MouseButton>) -> Self {
        Self {
            id: input.pointer_id,
            pointer_type: input.pointer_type,
            position: input.position,
            delta: DVec2::ZERO,
            mouse_button,
        }
    }

    /// The synthetic pointer created by pointer lock.
    #[must_use]
    pub fn locked() -> Self {
        Self {
            id: LOCKED_POINTER_ID,
            pointer_type: PointerType::Mouse,
            position: DVec2::ZERO,
            delta: DVec2::ZERO,
            mouse_button: None,
        }
    }
}

/// Ordered set of active pointers.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    pointers: Vec<PointerRecord>,
}

impl PointerTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active pointers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// `true` when no pointer is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Active pointers in press order.
    #[must_use]
    pub fn pointers(&self) -> &[PointerRecord] {
        &self.pointers
    }

    /// Look up a pointer by id.
    #[must_use]
    pub fn get(&self, id: i32) -> Option<&PointerRecord> {
        self.pointers.iter().find(|p| p.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: i32) -> Option<&mut PointerRecord> {
        self.pointers.iter_mut().find(|p| p.id == id)
    }

    /// Add a pointer. A stale record holding the same mouse button is
    /// evicted first: its release was never delivered. Returns the evicted
    /// record.
    pub fn insert(&mut self, record: PointerRecord) -> Option<PointerRecord> {
        let evicted = record
            .mouse_button
            .and_then(|button| self.remove_by_button(button));
        if let Some(stale) = &evicted {
            log::debug!(
                "evicted stale pointer {} holding {:?}",
                stale.id,
                stale.mouse_button
            );
        }
        self.pointers.push(record);
        evicted
    }

    /// Remove a pointer by id.
    pub fn remove(&mut self, id: i32) -> Option<PointerRecord> {
        let index = self.pointers.iter().position(|p| p.id == id)?;
        Some(self.pointers.remove(index))
    }

    fn remove_by_button(&mut self, button: MouseButton) -> Option<PointerRecord> {
        let index = self
            .pointers
            .iter()
            .position(|p| p.mouse_button == Some(button))?;
        Some(self.pointers.remove(index))
    }

    /// Drop every pointer.
    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    /// Mean position of the active pointers.
    #[must_use]
    pub fn centroid(&self) -> DVec2 {
        if self.pointers.is_empty() {
            return DVec2::ZERO;
        }
        let sum: DVec2 = self.pointers.iter().map(|p| p.position).sum();
        sum / self.pointers.len() as f64
    }

    /// Distance between the first two pointers, if there are two.
    #[must_use]
    pub fn pinch_distance(&self) -> Option<f64> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some(a.position.distance(b.position)),
            _ => None,
        }
    }
}
