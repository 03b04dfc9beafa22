//! Design persistence
//!
//! Callers depend on the `DesignStore` trait; the in-memory implementation
//! backs the server and the tests. A hosted database would implement the
//! same trait.

use crate::command::action::ActionDescriptor;
use crate::core::error::{Result, RoomError};
use crate::designs::model::{now_secs, Design};
use crate::room::state::DesignState;
use ahash::AHashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Storage for designs
pub trait DesignStore: Send + Sync {
    /// Insert a new design. Fails if the id or slug is taken.
    fn insert(&self, design: Design) -> Result<Design>;

    fn get(&self, id: Uuid) -> Result<Design>;

    fn get_by_slug(&self, slug: &str) -> Result<Design>;

    /// All designs, newest first
    fn list(&self) -> Vec<Design>;

    /// Replace a design's state and bump `updated_at`
    fn update_state(&self, id: Uuid, state: DesignState) -> Result<Design>;

    /// Apply a descriptor to the stored state in one step. Returns the
    /// design as stored afterwards and whether the state changed.
    fn apply_action(&self, id: Uuid, descriptor: &ActionDescriptor) -> Result<(Design, bool)>;

    fn set_public(&self, id: Uuid, is_public: bool) -> Result<Design>;

    fn delete(&self, id: Uuid) -> Result<()>;

    /// Count one view and return the new total
    fn increment_views(&self, id: Uuid) -> Result<u64>;
}

/// In-memory design store
#[derive(Default)]
pub struct MemoryDesignStore {
    designs: RwLock<AHashMap<Uuid, Design>>,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AHashMap<Uuid, Design>> {
        self.designs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AHashMap<Uuid, Design>> {
        self.designs.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl DesignStore for MemoryDesignStore {
    fn insert(&self, design: Design) -> Result<Design> {
        let mut designs = self.write();
        if designs.contains_key(&design.id) {
            return Err(RoomError::InvalidDesign(format!(
                "design {} already exists",
                design.id
            )));
        }
        if designs.values().any(|d| d.slug == design.slug) {
            return Err(RoomError::InvalidDesign(format!(
                "slug '{}' is already taken",
                design.slug
            )));
        }
        designs.insert(design.id, design.clone());
        Ok(design)
    }

    fn get(&self, id: Uuid) -> Result<Design> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RoomError::DesignNotFound(id.to_string()))
    }

    fn get_by_slug(&self, slug: &str) -> Result<Design> {
        self.read()
            .values()
            .find(|d| d.slug == slug)
            .cloned()
            .ok_or_else(|| RoomError::DesignNotFound(slug.to_string()))
    }

    fn list(&self) -> Vec<Design> {
        let mut designs: Vec<Design> = self.read().values().cloned().collect();
        designs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        designs
    }

    fn update_state(&self, id: Uuid, state: DesignState) -> Result<Design> {
        let mut designs = self.write();
        let design = designs
            .get_mut(&id)
            .ok_or_else(|| RoomError::DesignNotFound(id.to_string()))?;
        design.design_state = state;
        design.updated_at = now_secs();
        Ok(design.clone())
    }

    fn apply_action(&self, id: Uuid, descriptor: &ActionDescriptor) -> Result<(Design, bool)> {
        let mut designs = self.write();
        let design = designs
            .get_mut(&id)
            .ok_or_else(|| RoomError::DesignNotFound(id.to_string()))?;
        let applied = design.design_state.apply(descriptor);
        if applied {
            design.updated_at = now_secs();
        }
        Ok((design.clone(), applied))
    }

    fn set_public(&self, id: Uuid, is_public: bool) -> Result<Design> {
        let mut designs = self.write();
        let design = designs
            .get_mut(&id)
            .ok_or_else(|| RoomError::DesignNotFound(id.to_string()))?;
        design.is_public = is_public;
        design.updated_at = now_secs();
        Ok(design.clone())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RoomError::DesignNotFound(id.to_string()))
    }

    fn increment_views(&self, id: Uuid) -> Result<u64> {
        let mut designs = self.write();
        let design = designs
            .get_mut(&id)
            .ok_or_else(|| RoomError::DesignNotFound(id.to_string()))?;
        design.views += 1;
        Ok(design.views)
    }
}
