//! Shader descriptor

/// Pipeline stage a shader binary runs at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
    Compute,
}

/// Descriptor for creating a shader from an already compiled binary
///
/// Compilation and reflection belong to the shader toolchain; the HAL only
/// stores the bytes and hands them to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDesc {
    pub stage: ShaderStage,
    /// Backend-specific bytecode (DXBC, SPIR-V, ...)
    pub code: Vec<u8>,
    /// Entry point name
    pub entry_point: String,
}

impl ShaderDesc {
    pub fn new(stage: ShaderStage, code: Vec<u8>) -> Self {
        Self { stage, code, entry_point: "main".to_string() }
    }
}
