//! Renderer mode enumerations
//!
//! Values outside the known set are kept as `Other` so they survive re-encoding.

macro_rules! raw_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other(i32),
        }

        impl $name {
            pub fn from_i32(value: i32) -> Self {
                match value {
                    $($value => Self::$variant,)+
                    other => Self::Other(other),
                }
            }

            pub fn to_i32(self) -> i32 {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Other(value) => value,
                }
            }

            pub fn from_u8(value: u8) -> Self {
                Self::from_i32(i32::from(value))
            }

            pub fn to_u8(self) -> u8 {
                self.to_i32() as u8
            }
        }
    };
}

raw_enum! {
    /// How a renderer casts shadows.
    ShadowCastingMode {
        Off = 0,
        On = 1,
        TwoSided = 2,
        ShadowsOnly = 3,
    }
}

raw_enum! {
    MotionVectorGenerationMode {
        Camera = 0,
        Object = 1,
        ForceNoMotion = 2,
    }
}

raw_enum! {
    LightProbeUsage {
        Off = 0,
        BlendProbes = 1,
        UseProxyVolume = 2,
        CustomProvided = 4,
    }
}

raw_enum! {
    ReflectionProbeUsage {
        Off = 0,
        BlendProbes = 1,
        BlendProbesAndSkybox = 2,
        Simple = 3,
    }
}

raw_enum! {
    /// Selection outline state in the editor scene view.
    EditorSelectedRenderState {
        Hidden = 0,
        Wireframe = 1,
        Highlight = 2,
        WireframeAndHighlight = 3,
    }
}
