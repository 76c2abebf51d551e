//! Material descriptors and the fixed material table.
//!
//! Materials are plain data: how each kind scatters light lives in the
//! renderer. A material is addressed by a small `MaterialId` into a table
//! that never changes once built.

use lumen_math::Vec3;

/// Color type alias (linear RGB, reflectance typically 0-1)
pub type Color = Vec3;

/// Index of refraction of the glass material (relative to vacuum).
pub const GLASS_IOR: f32 = 1.5;

/// Roughness of the microfacet material.
pub const MICROFACET_ROUGHNESS: f32 = 0.1;

/// Index into a `MaterialTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u8);

impl MaterialId {
    pub const WHITE: MaterialId = MaterialId(0);
    pub const RED: MaterialId = MaterialId(1);
    pub const GREEN: MaterialId = MaterialId(2);
    pub const LIGHT: MaterialId = MaterialId(3);
    pub const MIRROR: MaterialId = MaterialId(4);
    pub const BLUE: MaterialId = MaterialId(5);
    pub const GOLD: MaterialId = MaterialId(6);
    pub const PALE: MaterialId = MaterialId(7);
    pub const GLASS: MaterialId = MaterialId(8);
    pub const MICROFACET: MaterialId = MaterialId(9);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Discriminant of a `Material`, for logging and dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Diffuse,
    Mirror,
    Light,
    Glass,
    Microfacet,
}

/// Surface description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian reflector
    Diffuse { albedo: Color },
    /// Perfect specular reflector
    Mirror { albedo: Color },
    /// Emitter; always terminates a path
    Light { emission: Color },
    /// Smooth dielectric with unit albedo
    Glass { ior: f32 },
    /// GGX rough reflector; `albedo` is the normal-incidence Fresnel F0
    Microfacet { albedo: Color, roughness: f32 },
}

impl Material {
    pub fn kind(&self) -> MaterialKind {
        match self {
            Material::Diffuse { .. } => MaterialKind::Diffuse,
            Material::Mirror { .. } => MaterialKind::Mirror,
            Material::Light { .. } => MaterialKind::Light,
            Material::Glass { .. } => MaterialKind::Glass,
            Material::Microfacet { .. } => MaterialKind::Microfacet,
        }
    }

    /// Reflectance of the surface. Lights reflect nothing; glass is lossless.
    pub fn albedo(&self) -> Color {
        match *self {
            Material::Diffuse { albedo }
            | Material::Mirror { albedo }
            | Material::Microfacet { albedo, .. } => albedo,
            Material::Light { .. } => Color::ZERO,
            Material::Glass { .. } => Color::ONE,
        }
    }

    /// Emitted radiance. Zero for everything but lights.
    pub fn emission(&self) -> Color {
        match *self {
            Material::Light { emission } => emission,
            _ => Color::ZERO,
        }
    }

    pub fn is_emissive(&self) -> bool {
        matches!(self, Material::Light { .. })
    }

    /// True if the surface takes part in next-event estimation.
    pub fn receives_direct_light(&self) -> bool {
        matches!(self, Material::Diffuse { .. })
    }
}

/// Immutable table of materials addressed by `MaterialId`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTable {
    materials: Vec<Material>,
}

impl MaterialTable {
    /// Create a table; `materials[i]` is addressed by `MaterialId(i)`.
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    /// The Cornell box palette, with the light emitting `light_intensity`
    /// on every channel.
    pub fn cornell(light_intensity: f32) -> Self {
        Self::new(vec![
            // WHITE
            Material::Diffuse { albedo: Color::new(0.73, 0.73, 0.73) },
            // RED
            Material::Diffuse { albedo: Color::new(0.65, 0.05, 0.05) },
            // GREEN
            Material::Diffuse { albedo: Color::new(0.12, 0.45, 0.15) },
            // LIGHT
            Material::Light { emission: Color::splat(light_intensity) },
            // MIRROR
            Material::Mirror { albedo: Color::new(0.95, 0.95, 0.95) },
            // BLUE
            Material::Diffuse { albedo: Color::new(0.1, 0.1, 0.7) },
            // GOLD
            Material::Diffuse { albedo: Color::new(1.0, 0.78, 0.34) },
            // PALE
            Material::Diffuse { albedo: Color::new(0.9, 0.95, 1.0) },
            // GLASS
            Material::Glass { ior: GLASS_IOR },
            // MICROFACET
            Material::Microfacet {
                albedo: Color::new(0.4, 0.6, 0.7),
                roughness: MICROFACET_ROUGHNESS,
            },
        ])
    }

    /// Get a material by ID.
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    /// Get a material by ID that is known to exist.
    ///
    /// # Panics
    ///
    /// Panics on an id outside the table. Scenes validate their ids at
    /// construction, so this only fires on a programming error.
    #[inline]
    pub fn lookup(&self, id: MaterialId) -> &Material {
        match self.materials.get(id.index()) {
            Some(material) => material,
            None => panic!(
                "material {:?} is not defined ({} materials in table)",
                id,
                self.materials.len()
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
