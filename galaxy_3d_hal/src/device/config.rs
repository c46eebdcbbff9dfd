//! Render system configuration

use crate::capability::{AdapterInfo, AdapterKind, FeatureLevel, ShadingLanguage, Vendor};

/// Render system configuration
#[derive(Debug, Clone)]
pub struct RenderSystemConfig {
    /// Application name
    pub app_name: String,
    /// Feature levels to try, any order (tried highest first)
    pub feature_levels: Vec<FeatureLevel>,
    /// Try the software adapter when the hardware adapter refuses every level
    pub allow_software_fallback: bool,
    /// Trace every resource operation
    pub debug: bool,
}

impl Default for RenderSystemConfig {
    fn default() -> Self {
        Self {
            app_name: "Galaxy3D Application".to_string(),
            feature_levels: FeatureLevel::DESCENDING.to_vec(),
            allow_software_fallback: true,
            debug: cfg!(debug_assertions),
        }
    }
}

/// Description of the device a render system runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererInfo {
    /// Adapter name
    pub renderer_name: String,
    pub vendor: Vendor,
    pub adapter_kind: AdapterKind,
    /// Native API of the backend
    pub api_name: &'static str,
    pub feature_level: FeatureLevel,
    pub shading_language: ShadingLanguage,
}

impl RendererInfo {
    pub(crate) fn new(adapter: &AdapterInfo, api_name: &'static str, feature_level: FeatureLevel) -> Self {
        Self {
            renderer_name: adapter.name.clone(),
            vendor: adapter.vendor,
            adapter_kind: adapter.kind,
            api_name,
            feature_level,
            shading_language: feature_level.shading_language(),
        }
    }
}
