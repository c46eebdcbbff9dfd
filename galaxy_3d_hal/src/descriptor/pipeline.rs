//! Pipeline descriptors

use crate::registry::ShaderHandle;

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
    /// Tessellation patches with the given number of control points
    Patches(u32),
}

/// Graphics pipeline descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsPipelineDesc {
    pub vertex_shader: ShaderHandle,
    pub tess_control_shader: Option<ShaderHandle>,
    pub tess_evaluation_shader: Option<ShaderHandle>,
    pub geometry_shader: Option<ShaderHandle>,
    pub fragment_shader: Option<ShaderHandle>,
    pub topology: PrimitiveTopology,
    /// Rasterizer sample count (1 = no multisampling)
    pub sample_count: u32,
}

impl GraphicsPipelineDesc {
    /// Vertex + fragment pipeline drawing triangle lists
    pub fn new(vertex_shader: ShaderHandle, fragment_shader: ShaderHandle) -> Self {
        Self {
            vertex_shader,
            tess_control_shader: None,
            tess_evaluation_shader: None,
            geometry_shader: None,
            fragment_shader: Some(fragment_shader),
            topology: PrimitiveTopology::TriangleList,
            sample_count: 1,
        }
    }
}

/// Pipeline descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineDesc {
    Graphics(GraphicsPipelineDesc),
    Compute { shader: ShaderHandle },
}
