//! Declarative scene layouts
//!
//! Each variant is a fixed table of [`ObjectSpec`]s. The scene iterates the
//! table uniformly; nothing here touches the GPU.

use std::{fmt, str::FromStr};

use cgmath::{Matrix4, Vector3};
use clap::ValueEnum;
use thiserror::Error;

use crate::{
    error::Result,
    gfx::geometry::{generate_cube, generate_sphere, CubeStyle, GeometryData},
};

use super::mesh::ShadingModel;

/// Which arrangement of objects to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SceneVariant {
    /// Table top, four legs, four rails and three balls.
    #[default]
    #[value(name = "pool", alias = "pool-table", alias = "table")]
    PoolTable,
    /// One sphere and one stretched cube.
    #[value(name = "showcase", alias = "sphere")]
    Showcase,
}

impl SceneVariant {
    pub fn name(self) -> &'static str {
        match self {
            SceneVariant::PoolTable => "pool",
            SceneVariant::Showcase => "showcase",
        }
    }
}

impl fmt::Display for SceneVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scene '{0}', expected 'pool' or 'showcase'")]
pub struct ParseSceneVariantError(pub String);

impl FromStr for SceneVariant {
    type Err = ParseSceneVariantError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pool" | "pool-table" | "table" => Ok(SceneVariant::PoolTable),
            "showcase" | "sphere" => Ok(SceneVariant::Showcase),
            _ => Err(ParseSceneVariantError(s.to_string())),
        }
    }
}

/// Procedural shape an object is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeSpec {
    Cube(CubeStyle),
    Sphere { radius: f64, lats: i32, longs: i32 },
}

impl ShapeSpec {
    pub fn generate(&self) -> Result<GeometryData> {
        match *self {
            ShapeSpec::Cube(style) => Ok(generate_cube(style)),
            ShapeSpec::Sphere {
                radius,
                lats,
                longs,
            } => generate_sphere(radius, lats, longs),
        }
    }
}

/// Object-local scale and translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: Vector3<f32>,
    pub translate: Vector3<f32>,
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        scale: Vector3::new(1.0, 1.0, 1.0),
        translate: Vector3::new(0.0, 0.0, 0.0),
    };

    pub fn new(scale: [f32; 3], translate: [f32; 3]) -> Self {
        Self {
            scale: scale.into(),
            translate: translate.into(),
        }
    }

    /// `Scale * Translate`: the translation is expressed in scaled units.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
            * Matrix4::from_translation(self.translate)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    pub name: String,
    pub shape: ShapeSpec,
    pub placement: Placement,
    pub shading: ShadingModel,
}

impl ObjectSpec {
    fn cube(name: impl Into<String>, style: CubeStyle, placement: Placement) -> Self {
        Self {
            name: name.into(),
            shape: ShapeSpec::Cube(style),
            placement,
            shading: ShadingModel::Diffuse,
        }
    }

    fn sphere(name: impl Into<String>, lats: i32, longs: i32, placement: Placement) -> Self {
        Self {
            name: name.into(),
            shape: ShapeSpec::Sphere {
                radius: 1.0,
                lats,
                longs,
            },
            placement,
            shading: ShadingModel::Phong,
        }
    }
}

// Pool table placements, in the scaled units of each part.
const LEG_SCALE: [f32; 3] = [0.1, 0.5, 0.1];
const LEG_OFFSETS: [[f32; 3]; 4] = [
    [18.0, -1.2, 8.0],
    [-18.0, -1.2, 8.0],
    [18.0, -1.2, -8.0],
    [-18.0, -1.2, -8.0],
];
const BALL_SCALE: [f32; 3] = [0.1, 0.1, 0.1];
const BALL_OFFSETS: [[f32; 3]; 3] = [[0.0, 2.0, 0.0], [5.0, 2.0, 3.0], [-7.0, 2.0, -2.0]];

/// Builds the object table for `variant`. Spheres use `lats` x `longs` bands.
pub fn scene_layout(variant: SceneVariant, lats: i32, longs: i32) -> Vec<ObjectSpec> {
    match variant {
        SceneVariant::PoolTable => pool_table(lats, longs),
        SceneVariant::Showcase => showcase(lats, longs),
    }
}

fn pool_table(lats: i32, longs: i32) -> Vec<ObjectSpec> {
    let mut objects = vec![ObjectSpec::cube(
        "table top",
        CubeStyle::Top,
        Placement::new([2.0, 0.1, 1.0], [0.0, 0.0, 0.0]),
    )];

    objects.extend(LEG_OFFSETS.iter().enumerate().map(|(i, &offset)| {
        ObjectSpec::cube(
            format!("leg {}", i + 1),
            CubeStyle::Leg,
            Placement::new(LEG_SCALE, offset),
        )
    }));

    let rails = [
        ("rail north", [2.0, 0.1, 0.1], [0.0, 1.0, 10.0]),
        ("rail south", [2.0, 0.1, 0.1], [0.0, 1.0, -10.0]),
        ("rail east", [0.1, 0.1, 1.0], [20.0, 1.0, 0.0]),
        ("rail west", [0.1, 0.1, 1.0], [-20.0, 1.0, 0.0]),
    ];
    objects.extend(rails.into_iter().map(|(name, scale, offset)| {
        ObjectSpec::cube(name, CubeStyle::Leg, Placement::new(scale, offset))
    }));

    objects.extend(BALL_OFFSETS.iter().enumerate().map(|(i, &offset)| {
        ObjectSpec::sphere(
            format!("ball {}", i + 1),
            lats,
            longs,
            Placement::new(BALL_SCALE, offset),
        )
    }));

    objects
}

fn showcase(lats: i32, longs: i32) -> Vec<ObjectSpec> {
    vec![
        ObjectSpec::sphere("sphere", lats, longs, Placement::IDENTITY),
        ObjectSpec::cube(
            "cube",
            CubeStyle::Decorative,
            Placement::new([1.0, 2.0, 1.0], [0.0, 0.0, 0.0]),
        ),
    ]
}
