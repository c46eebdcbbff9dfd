//! Opaque, generation-checked resource handles

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

slotmap::new_key_type! {
    /// Generational slot key inside one registry
    pub struct RegistryKey;
}

/// Process-unique identity of a registry (and hence of a backend instance)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryId(pub(crate) u32);

impl RegistryId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Resource kind, used to log and report which registry a handle targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKindTag {
    Texture,
    Buffer,
    Shader,
    Pipeline,
    RenderContext,
}

/// Compile-time marker tying a handle to one kind of resource
pub trait ResourceKind: 'static {
    const TAG: ResourceKindTag;
}

macro_rules! resource_kinds {
    ($($marker:ident => $tag:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $marker;

            impl ResourceKind for $marker {
                const TAG: ResourceKindTag = ResourceKindTag::$tag;
            }
        )*
    };
}

resource_kinds! {
    TextureKind => Texture,
    BufferKind => Buffer,
    ShaderKind => Shader,
    PipelineKind => Pipeline,
    RenderContextKind => RenderContext,
}

/// Handle to one live resource of kind `K` in one registry
///
/// Handles are plain values: copying one does not extend the resource's
/// lifetime. A handle outliving its resource is detected on resolve
/// (the slot generation no longer matches).
pub struct Handle<K: ResourceKind> {
    key: RegistryKey,
    registry: RegistryId,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Handle<K> {
    pub(crate) fn new(key: RegistryKey, registry: RegistryId) -> Self {
        Self { key, registry, _kind: PhantomData }
    }

    pub(crate) fn key(&self) -> RegistryKey {
        self.key
    }

    /// Registry that issued this handle
    pub fn registry_id(&self) -> RegistryId {
        self.registry
    }

    pub fn kind(&self) -> ResourceKindTag {
        K::TAG
    }
}

// Manual impls: derives would put bounds on K.

impl<K: ResourceKind> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ResourceKind> Copy for Handle<K> {}

impl<K: ResourceKind> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.registry == other.registry
    }
}

impl<K: ResourceKind> Eq for Handle<K> {}

impl<K: ResourceKind> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.registry.hash(state);
    }
}

impl<K: ResourceKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}Handle({:?}@{})", K::TAG, self.key, self.registry.0)
    }
}

pub type TextureHandle = Handle<TextureKind>;
pub type BufferHandle = Handle<BufferKind>;
pub type ShaderHandle = Handle<ShaderKind>;
pub type PipelineHandle = Handle<PipelineKind>;
pub type RenderContextHandle = Handle<RenderContextKind>;
