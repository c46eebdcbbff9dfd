//! Feature levels and shading language tiers

use std::fmt;

/// Ordered capability tier; a higher level implies every lower one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureLevel {
    Level9_1,
    Level9_2,
    Level9_3,
    Level10_0,
    Level10_1,
    Level11_0,
    Level11_1,
    Level12_0,
    Level12_1,
}

impl FeatureLevel {
    /// Every level, highest first
    pub const DESCENDING: [FeatureLevel; 9] = [
        FeatureLevel::Level12_1,
        FeatureLevel::Level12_0,
        FeatureLevel::Level11_1,
        FeatureLevel::Level11_0,
        FeatureLevel::Level10_1,
        FeatureLevel::Level10_0,
        FeatureLevel::Level9_3,
        FeatureLevel::Level9_2,
        FeatureLevel::Level9_1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureLevel::Level9_1 => "9_1",
            FeatureLevel::Level9_2 => "9_2",
            FeatureLevel::Level9_3 => "9_3",
            FeatureLevel::Level10_0 => "10_0",
            FeatureLevel::Level10_1 => "10_1",
            FeatureLevel::Level11_0 => "11_0",
            FeatureLevel::Level11_1 => "11_1",
            FeatureLevel::Level12_0 => "12_0",
            FeatureLevel::Level12_1 => "12_1",
        }
    }

    /// Highest shader model available at this level
    pub fn shading_language(self) -> ShadingLanguage {
        if self >= FeatureLevel::Level11_0 {
            ShadingLanguage::HLSL_5_0
        } else if self >= FeatureLevel::Level10_1 {
            ShadingLanguage::HLSL_4_1
        } else if self >= FeatureLevel::Level10_0 {
            ShadingLanguage::HLSL_4_0
        } else if self >= FeatureLevel::Level9_3 {
            ShadingLanguage::HLSL_3_0
        } else if self >= FeatureLevel::Level9_2 {
            ShadingLanguage::HLSL_2_0b
        } else {
            ShadingLanguage::HLSL_2_0a
        }
    }
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shader model tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum ShadingLanguage {
    HLSL_2_0a,
    HLSL_2_0b,
    HLSL_3_0,
    HLSL_4_0,
    HLSL_4_1,
    HLSL_5_0,
}
