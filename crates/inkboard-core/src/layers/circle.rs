//! Circle (ellipse) layer.

use super::{LayerBase, LayerTrait, LayerType};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An ellipse inscribed in `width × height`. Origin is the centre, which is
/// where the renderer anchors circles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleLayer {
    #[serde(flatten)]
    pub base: LayerBase,
}

impl CircleLayer {
    pub fn new(base: LayerBase) -> Self {
        Self { base }
    }

    pub fn radius_x(&self) -> f64 {
        self.base.width.abs() / 2.0
    }

    pub fn radius_y(&self) -> f64 {
        self.base.height.abs() / 2.0
    }
}

impl LayerTrait for CircleLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Circle
    }

    fn local_bounds(&self) -> Rect {
        let (rx, ry) = (self.radius_x(), self.radius_y());
        Rect::new(-rx, -ry, rx, ry)
    }

    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool {
        let pad = tolerance + self.base.stroke_width / 2.0;
        let rx = self.radius_x() + pad;
        let ry = self.radius_y() + pad;
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        let nx = point.x / rx;
        let ny = point.y / ry;
        nx * nx + ny * ny <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_centered() {
        let circle = CircleLayer::new(LayerBase::new(50.0, 50.0, 100.0, 60.0));
        let bounds = circle.local_bounds();
        assert!((bounds.x0 + 50.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let circle = CircleLayer::new(LayerBase::new(0.0, 0.0, 100.0, 100.0));
        assert!(circle.hit_test_local(Point::new(0.0, 0.0), 0.0));
        assert!(circle.hit_test_local(Point::new(49.0, 0.0), 0.0));
        // Inside the bounding box but outside the ellipse.
        assert!(!circle.hit_test_local(Point::new(45.0, 45.0), 0.0));
    }
}
