use crate::Vec3;

/// Axis-aligned bounding extents (componentwise min/max).
///
/// The empty value holds `min = +inf` and `max = -inf`; check [`Extents::is_empty`]
/// before deriving sizes or centers from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
    pub min: Vec3,
    pub max: Vec3,
}

impl Extents {
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// `true` while no point has been included.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Edge lengths. Meaningless for empty extents.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.min + self.size() * 0.5
    }
}

impl Default for Extents {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl FromIterator<Vec3> for Extents {
    fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
        let mut extents = Self::EMPTY;
        for point in iter {
            extents.include(point);
        }
        extents
    }
}
