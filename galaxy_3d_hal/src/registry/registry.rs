//! Per-kind store owning native objects behind opaque handles

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::SlotMap;

use super::handle::{Handle, RegistryId, RegistryKey, ResourceKind, ResourceKindTag};
use crate::error::Result;
use crate::hal_err;

/// Next registry id; 0 is never issued
static NEXT_REGISTRY_ID: AtomicU32 = AtomicU32::new(1);

/// Owning store for one resource kind of one backend instance
///
/// Removing an entry hands the native object back to the caller, who
/// destroys it. Handles from another registry are refused even when their
/// slot happens to be occupied here.
///
/// # Example
///
/// ```
/// use galaxy_3d_hal::galaxy3d::registry::{Registry, TextureKind};
///
/// let mut textures: Registry<TextureKind, &str> = Registry::new();
/// let handle = textures.insert("albedo");
/// assert_eq!(*textures.resolve(handle).unwrap(), "albedo");
/// assert_eq!(textures.remove(handle).unwrap(), "albedo");
/// assert!(textures.resolve(handle).is_err());
/// ```
pub struct Registry<K: ResourceKind, T> {
    id: RegistryId,
    slots: SlotMap<RegistryKey, T>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind, T> Registry<K, T> {
    /// Create an empty registry with a fresh identity
    pub fn new() -> Self {
        Self {
            id: RegistryId(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed)),
            slots: SlotMap::with_key(),
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> RegistryId {
        self.id
    }

    pub fn kind(&self) -> ResourceKindTag {
        K::TAG
    }

    /// Take ownership of `value` and return its handle
    pub fn insert(&mut self, value: T) -> Handle<K> {
        let key = self.slots.insert(value);
        Handle::new(key, self.id)
    }

    /// Give the object back and invalidate the handle
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a handle that is foreign, stale or already removed.
    pub fn remove(&mut self, handle: Handle<K>) -> Result<T> {
        self.check_owner(handle)?;
        self.slots.remove(handle.key()).ok_or_else(|| {
            hal_err!(
                InvalidArgument,
                "galaxy3d::hal::registry",
                "{:?} was already released",
                handle
            )
        })
    }

    /// Borrow the object behind `handle`
    pub fn resolve(&self, handle: Handle<K>) -> Result<&T> {
        self.check_owner(handle)?;
        self.slots.get(handle.key()).ok_or_else(|| Self::stale(handle))
    }

    /// Mutably borrow the object behind `handle`
    pub fn resolve_mut(&mut self, handle: Handle<K>) -> Result<&mut T> {
        self.check_owner(handle)?;
        self.slots.get_mut(handle.key()).ok_or_else(|| Self::stale(handle))
    }

    /// Whether `handle` currently resolves in this registry
    pub fn contains(&self, handle: Handle<K>) -> bool {
        handle.registry_id() == self.id && self.slots.contains_key(handle.key())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate live entries
    pub fn iter(&self) -> impl Iterator<Item = (Handle<K>, &T)> + '_ {
        let id = self.id;
        self.slots.iter().map(move |(key, value)| (Handle::new(key, id), value))
    }

    /// Remove every entry, invalidating all outstanding handles
    pub fn drain(&mut self) -> Vec<(Handle<K>, T)> {
        let id = self.id;
        self.slots.drain().map(|(key, value)| (Handle::new(key, id), value)).collect()
    }

    fn check_owner(&self, handle: Handle<K>) -> Result<()> {
        if handle.registry_id() != self.id {
            return Err(hal_err!(
                InvalidArgument,
                "galaxy3d::hal::registry",
                "{:?} belongs to registry {} and cannot be used with registry {}",
                handle,
                handle.registry_id().raw(),
                self.id.raw()
            ));
        }
        Ok(())
    }

    fn stale(handle: Handle<K>) -> crate::error::Error {
        hal_err!(
            InvalidArgument,
            "galaxy3d::hal::registry",
            "{:?} refers to a released {:?}",
            handle,
            K::TAG
        )
    }
}

impl<K: ResourceKind, T> Default for Registry<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
