//! Irregular rectangular regions, one bin per region.

use nalgebra::Vector2;

/// Screen rectangle of one object (e.g. a keyboard button).
///
/// `position` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRegion {
    pub position: Vector2<f32>,
    pub size: Vector2<f32>,
}

impl ScreenRegion {
    pub fn new(position: Vector2<f32>, size: Vector2<f32>) -> Self {
        Self { position, size }
    }

    pub fn center(&self) -> Vector2<f32> {
        self.position + self.size / 2.0
    }

    /// Closed containment test
    pub fn contains(&self, point: &Vector2<f32>) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.size.x
            && point.y >= self.position.y
            && point.y <= self.position.y + self.size.y
    }
}

/// Region holding `point`.
///
/// The first region containing the point wins. Otherwise the region whose
/// centre is nearest, provided it is strictly closer than `threshold`.
pub fn locate_region(regions: &[ScreenRegion], point: &Vector2<f32>, threshold: f32) -> Option<usize> {
    let mut nearest: Option<(usize, f32)> = None;

    for (index, region) in regions.iter().enumerate() {
        if region.contains(point) {
            return Some(index);
        }
        let distance = (point - region.center()).norm();
        if distance < threshold && nearest.map_or(true, |(_, best)| distance < best) {
            nearest = Some((index, distance));
        }
    }

    nearest.map(|(index, _)| index)
}
