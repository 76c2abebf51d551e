//! Scene description for the Cornell box.
//!
//! The scene is a fixed list of boxes and spheres plus one rectangular area
//! light. It is validated once at construction and never changes afterwards;
//! a parameter change builds a new `Scene`.

use lumen_math::{Aabb, RigidTransform, Vec3};
use thiserror::Error;

use crate::material::{Color, MaterialId, MaterialTable};

/// Errors detected while building a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Primitive '{primitive}' references undefined material {material:?}")]
    UnknownMaterial { primitive: String, material: MaterialId },

    #[error("Box '{primitive}' has zero or negative extent")]
    DegenerateBox { primitive: String },

    #[error("Sphere '{primitive}' has invalid radius {radius}")]
    InvalidSphere { primitive: String, radius: f32 },

    #[error("Area light has zero area")]
    DegenerateLight,
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialId,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// A box primitive, optionally rotated about a pivot.
///
/// For a rotated box, `bounds` are expressed in the local frame, centered on
/// the pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub bounds: Aabb,
    pub material: MaterialId,
    pub transform: Option<RigidTransform>,
}

impl Cuboid {
    /// World-space axis-aligned box.
    pub fn axis_aligned(min: Vec3, max: Vec3, material: MaterialId) -> Self {
        Self {
            bounds: Aabb::from_points(min, max),
            material,
            transform: None,
        }
    }

    /// Box of the given size centered on `transform.pivot` and rotated by it.
    pub fn rotated(size: Vec3, transform: RigidTransform, material: MaterialId) -> Self {
        Self {
            bounds: Aabb::centered(size),
            material,
            transform: Some(transform),
        }
    }
}

/// Scene geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Cuboid(Cuboid),
}

impl Primitive {
    pub fn material(&self) -> MaterialId {
        match self {
            Primitive::Sphere(sphere) => sphere.material,
            Primitive::Cuboid(cuboid) => cuboid.material,
        }
    }
}

/// A named primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub primitive: Primitive,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            primitive,
        }
    }
}

/// Parallelogram emitter used for next-event estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    /// One corner of the emitting face
    pub corner: Vec3,
    /// First edge from `corner`
    pub edge_u: Vec3,
    /// Second edge from `corner`
    pub edge_v: Vec3,
    /// Unit normal on the emitting side
    pub normal: Vec3,
    pub emission: Color,
}

impl AreaLight {
    /// Point on the light for uniform samples `u`, `v` in [0, 1).
    #[inline]
    pub fn point_at(&self, u: f32, v: f32) -> Vec3 {
        self.corner + u * self.edge_u + v * self.edge_v
    }

    pub fn area(&self) -> f32 {
        self.edge_u.cross(self.edge_v).length()
    }
}

/// A complete, validated scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Scene name (for logging)
    pub name: String,
    objects: Vec<SceneObject>,
    materials: MaterialTable,
    light: AreaLight,
}

impl Scene {
    /// Validate and assemble a scene.
    pub fn new(
        name: impl Into<String>,
        objects: Vec<SceneObject>,
        materials: MaterialTable,
        light: AreaLight,
    ) -> SceneResult<Self> {
        for object in &objects {
            let material = object.primitive.material();
            if materials.get(material).is_none() {
                return Err(SceneError::UnknownMaterial {
                    primitive: object.name.clone(),
                    material,
                });
            }

            match &object.primitive {
                Primitive::Sphere(sphere) => {
                    if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                        return Err(SceneError::InvalidSphere {
                            primitive: object.name.clone(),
                            radius: sphere.radius,
                        });
                    }
                }
                Primitive::Cuboid(cuboid) => {
                    if cuboid.bounds.is_degenerate() {
                        return Err(SceneError::DegenerateBox {
                            primitive: object.name.clone(),
                        });
                    }
                }
            }
        }

        if !(light.area() > 0.0) {
            return Err(SceneError::DegenerateLight);
        }

        let scene = Self {
            name: name.into(),
            objects,
            materials,
            light,
        };
        log::info!(
            "Built scene '{}': {} primitives, {} materials",
            scene.name,
            scene.objects.len(),
            scene.materials.len()
        );
        Ok(scene)
    }

    /// The Cornell box with two rotated boxes, a glass sphere and a gold
    /// sphere, lit by a ceiling light of the given intensity.
    pub fn cornell_box(light_intensity: f32) -> SceneResult<Self> {
        let box_object = |name: &str, min: Vec3, max: Vec3, material| {
            SceneObject::new(name, Primitive::Cuboid(Cuboid::axis_aligned(min, max, material)))
        };

        let tall = RigidTransform::from_yxz(
            Vec3::new(265.0, 200.0, 375.0),
            (-66.0f32).to_radians(),
            0.0,
            0.0,
        );
        let short = RigidTransform::from_yxz(
            Vec3::new(180.0, 140.0, 205.0),
            45.0f32.to_radians(),
            45.0f32.to_radians(),
            0.0,
        );

        // Test order is tie-break order.
        let objects = vec![
            box_object("floor", Vec3::new(0.0, -10.0, 0.0), Vec3::new(555.0, 0.0, 800.0), MaterialId::WHITE),
            box_object("ceiling", Vec3::new(0.0, 555.0, 0.0), Vec3::new(555.0, 565.0, 800.0), MaterialId::WHITE),
            box_object("back_wall", Vec3::new(0.0, 0.0, 800.0), Vec3::new(555.0, 555.0, 810.0), MaterialId::WHITE),
            box_object("left_wall", Vec3::new(555.0, 0.0, 0.0), Vec3::new(565.0, 555.0, 800.0), MaterialId::RED),
            box_object("right_wall", Vec3::new(-10.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 800.0), MaterialId::GREEN),
            box_object("light", Vec3::new(180.0, 554.0, 300.0), Vec3::new(375.0, 555.0, 500.0), MaterialId::LIGHT),
            SceneObject::new(
                "tall_box",
                Primitive::Cuboid(Cuboid::rotated(Vec3::new(160.0, 300.0, 160.0), tall, MaterialId::MIRROR)),
            ),
            SceneObject::new(
                "short_box",
                Primitive::Cuboid(Cuboid::rotated(Vec3::splat(80.0), short, MaterialId::PALE)),
            ),
            SceneObject::new(
                "glass_sphere",
                Primitive::Sphere(Sphere::new(Vec3::new(450.0, 350.0, 380.0), 80.0, MaterialId::GLASS)),
            ),
            SceneObject::new(
                "gold_sphere",
                Primitive::Sphere(Sphere::new(Vec3::new(70.0, 450.0, 400.0), 60.0, MaterialId::GOLD)),
            ),
        ];

        // Bottom face of the light box.
        let light = AreaLight {
            corner: Vec3::new(180.0, 554.0, 300.0),
            edge_u: Vec3::new(195.0, 0.0, 0.0),
            edge_v: Vec3::new(0.0, 0.0, 200.0),
            normal: Vec3::new(0.0, -1.0, 0.0),
            emission: Color::splat(light_intensity),
        };

        Self::new("cornell_box", objects, MaterialTable::cornell(light_intensity), light)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    pub fn light(&self) -> &AreaLight {
        &self.light
    }

    /// Find an object by name.
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }
}
