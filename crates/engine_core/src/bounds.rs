//! Axis-aligned bounding boxes.

use glam::Vec3;

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let h = half_extents.abs();
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Bounds of a box of `half_extents` centred at `center`, spun `yaw` radians around +Y.
    pub fn from_yawed_box(center: Vec3, half_extents: Vec3, yaw: f32) -> Self {
        let (s, c) = yaw.sin_cos();
        let (s, c) = (s.abs(), c.abs());
        let hx = c * half_extents.x + s * half_extents.z;
        let hz = s * half_extents.x + c * half_extents.z;
        Self::from_center_half_extents(center, Vec3::new(hx, half_extents.y, hz))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Copy of this box moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Overlap test; touching faces count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Area shared with `other` on the XZ plane; zero when the footprints are apart.
    pub fn overlap_area_xz(&self, other: &Aabb) -> f32 {
        let dx = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let dz = self.max.z.min(other.max.z) - self.min.z.max(other.min.z);
        dx.max(0.0) * dz.max(0.0)
    }

    /// Whether `point` lies inside the box footprint on the XZ plane.
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }
}
