//! Pressure-sensitive stroke outlines.
//!
//! Raw samples are first streamlined into [`StrokePoint`]s (smoothed
//! positions with direction vectors and running length), then offset to
//! both sides by a pressure-dependent radius to form a closed polygon.

use super::StrokeOptions;
use crate::layers::StrokeSample;
use kurbo::{BezPath, Point, Vec2};
use std::f64::consts::PI;

/// How quickly simulated pressure follows pointer speed.
const RATE_OF_PRESSURE_CHANGE: f64 = 0.275;
/// Slightly more than π so caps overlap the sides instead of leaving a seam.
const FIXED_PI: f64 = PI + 0.0001;
/// Pressure assumed for samples that carry none.
const FALLBACK_PRESSURE: f64 = 0.5;
/// Pressure assumed for the first sample when it carries none.
const FIRST_FALLBACK_PRESSURE: f64 = 0.25;
/// Segments used for rounded corners and start caps.
const CORNER_STEPS: u32 = 13;
/// Segments used for the rounded end cap.
const END_CAP_STEPS: u32 = 29;
/// Points this close to the end of the stroke are skipped, except the last.
const END_NOISE_LENGTH: f64 = 3.0;

/// A streamlined stroke point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub point: Point,
    pub pressure: f64,
    /// Unit vector pointing from this point back to the previous one.
    pub vector: Vec2,
    /// Distance to the previous point.
    pub distance: f64,
    /// Length of the stroke up to this point.
    pub running_length: f64,
}

/// Streamline raw samples into stroke points.
pub fn stroke_points(samples: &[StrokeSample], options: &StrokeOptions) -> Vec<StrokePoint> {
    if samples.is_empty() {
        return Vec::new();
    }

    let t = 0.15 + (1.0 - options.streamline) * 0.85;

    let mut pts: Vec<(Point, Option<f64>)> = samples
        .iter()
        .map(|s| (s.point(), Some(s.pressure)))
        .collect();

    // Two samples give too little to smooth; interpolate extra points
    // between them. Interpolated points carry no pressure.
    if pts.len() == 2 {
        let (first, _) = pts[0];
        let (last, _) = pts[1];
        pts.truncate(1);
        for i in 1..5 {
            pts.push((first.lerp(last, i as f64 / 4.0), None));
        }
    }

    if pts.len() == 1 {
        let (point, pressure) = pts[0];
        pts.push((point + Vec2::new(1.0, 1.0), pressure));
    }

    let valid = |p: Option<f64>| p.filter(|p| *p >= 0.0);

    let mut out = vec![StrokePoint {
        point: pts[0].0,
        pressure: valid(pts[0].1).unwrap_or(FIRST_FALLBACK_PRESSURE),
        vector: Vec2::new(1.0, 1.0),
        distance: 0.0,
        running_length: 0.0,
    }];

    let mut has_reached_minimum_length = false;
    let mut running_length = 0.0;
    let max = pts.len() - 1;

    for (i, &(target, pressure)) in pts.iter().enumerate().skip(1) {
        let prev = out[out.len() - 1];
        let point = if options.last && i == max {
            target
        } else {
            prev.point.lerp(target, t)
        };

        if point == prev.point {
            continue;
        }

        let distance = point.distance(prev.point);
        running_length += distance;

        if i < max && !has_reached_minimum_length {
            if running_length < options.size {
                continue;
            }
            has_reached_minimum_length = true;
        }

        out.push(StrokePoint {
            point,
            pressure: valid(pressure).unwrap_or(FALLBACK_PRESSURE),
            vector: unit(prev.point - point),
            distance,
            running_length,
        });
    }

    out[0].vector = out.get(1).map(|p| p.vector).unwrap_or(Vec2::ZERO);
    out
}

/// Offset stroke points into a closed outline polygon.
///
/// Expects points from [`stroke_points`], which pads a lone sample into
/// two points, so a single tap comes out as a short capsule.
pub fn outline_from_points(points: &[StrokePoint], options: &StrokeOptions) -> Vec<Point> {
    let size = options.size;
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if size <= 0.0 {
        return Vec::new();
    }

    let total_length = last.running_length;
    let taper_start = options.start.taper.length(size, total_length);
    let taper_end = options.end.taper.length(size, total_length);
    let min_distance = (size * options.smoothing).powi(2);

    let mut left: Vec<Point> = Vec::new();
    let mut right: Vec<Point> = Vec::new();

    let mut prev_pressure = points.iter().take(10).fold(first.pressure, |acc, curr| {
        let pressure = if options.simulate_pressure {
            simulated_pressure(acc, curr.distance, size)
        } else {
            curr.pressure
        };
        (acc + pressure) / 2.0
    });

    let mut radius = stroke_radius(size, options.thinning, last.pressure);
    let mut prev_vector = first.vector;
    let mut pl = first.point;
    let mut pr = pl;
    let mut tl;
    let mut tr;
    let mut is_prev_point_sharp_corner = false;

    for (i, sp) in points.iter().enumerate() {
        let is_last = i == points.len() - 1;
        let mut pressure = sp.pressure;

        // Skip noisy points right before the end.
        if !is_last && total_length - sp.running_length < END_NOISE_LENGTH {
            continue;
        }

        if options.thinning != 0.0 {
            if options.simulate_pressure {
                pressure = simulated_pressure(prev_pressure, sp.distance, size);
            }
            radius = stroke_radius(size, options.thinning, pressure);
        } else {
            radius = size / 2.0;
        }

        let ts = if sp.running_length < taper_start {
            ease_out_quad(sp.running_length / taper_start)
        } else {
            1.0
        };
        let remaining = total_length - sp.running_length;
        let te = if remaining < taper_end {
            ease_out_cubic(remaining / taper_end)
        } else {
            1.0
        };
        radius = (radius * ts.min(te)).max(0.01);

        let next_vector = if is_last { sp.vector } else { points[i + 1].vector };
        let next_dpr = if is_last { 1.0 } else { sp.vector.dot(next_vector) };
        let prev_dpr = sp.vector.dot(prev_vector);

        let is_point_sharp_corner = prev_dpr < 0.0 && !is_prev_point_sharp_corner;
        let is_next_point_sharp_corner = next_dpr < 0.0;

        if is_point_sharp_corner || is_next_point_sharp_corner {
            // Wrap a half circle around the corner.
            let offset = perpendicular(prev_vector) * radius;
            tl = sp.point;
            tr = sp.point;
            for step in 0..=CORNER_STEPS {
                let t = step as f64 / CORNER_STEPS as f64;
                tl = rotate_around(sp.point - offset, sp.point, FIXED_PI * t);
                left.push(tl);
                tr = rotate_around(sp.point + offset, sp.point, FIXED_PI * -t);
                right.push(tr);
            }
            pl = tl;
            pr = tr;
            if is_next_point_sharp_corner {
                is_prev_point_sharp_corner = true;
            }
            continue;
        }

        is_prev_point_sharp_corner = false;

        if is_last {
            let offset = perpendicular(sp.vector) * radius;
            left.push(sp.point - offset);
            right.push(sp.point + offset);
            continue;
        }

        let offset = perpendicular(next_vector.lerp(sp.vector, next_dpr)) * radius;

        tl = sp.point - offset;
        if i <= 1 || (tl - pl).hypot2() > min_distance {
            left.push(tl);
            pl = tl;
        }

        tr = sp.point + offset;
        if i <= 1 || (tr - pr).hypot2() > min_distance {
            right.push(tr);
            pr = tr;
        }

        prev_pressure = pressure;
        prev_vector = sp.vector;
    }

    let first_point = first.point;
    let last_point = last.point;

    let mut start_cap: Vec<Point> = Vec::new();
    let mut end_cap: Vec<Point> = Vec::new();

    if taper_start > 0.0 {
        // Tapered starts need no cap.
    } else if options.start.cap {
        if let Some(&anchor) = right.first() {
            for step in 1..=CORNER_STEPS {
                let t = step as f64 / CORNER_STEPS as f64;
                start_cap.push(rotate_around(anchor, first_point, FIXED_PI * t));
            }
        }
    } else if let (Some(&l0), Some(&r0)) = (left.first(), right.first()) {
        let corners = l0 - r0;
        let offset_a = corners * 0.5;
        let offset_b = corners * 0.51;
        start_cap.extend([
            first_point - offset_a,
            first_point - offset_b,
            first_point + offset_b,
            first_point + offset_a,
        ]);
    }

    let direction = perpendicular(-last.vector);
    if taper_end > 0.0 {
        end_cap.push(last_point);
    } else if options.end.cap {
        let start = last_point + direction * radius;
        for step in 1..END_CAP_STEPS {
            let t = step as f64 / END_CAP_STEPS as f64;
            end_cap.push(rotate_around(start, last_point, FIXED_PI * 3.0 * t));
        }
    } else {
        end_cap.extend([
            last_point + direction * radius,
            last_point + direction * (radius * 0.99),
            last_point - direction * (radius * 0.99),
            last_point - direction * radius,
        ]);
    }

    let mut outline = left;
    outline.extend(end_cap);
    outline.extend(right.into_iter().rev());
    outline.extend(start_cap);
    outline
}

/// Compute the outline polygon for raw samples.
pub fn stroke_outline(samples: &[StrokeSample], options: &StrokeOptions) -> Vec<Point> {
    outline_from_points(&stroke_points(samples, options), options)
}

/// Turn an outline polygon into a closed, fillable path.
///
/// Each polygon vertex becomes the control point of a quadratic segment
/// ending at the midpoint to the next vertex, which rounds off the
/// polygon without moving it.
pub fn outline_to_path(outline: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = outline.first() else {
        return path;
    };

    path.move_to(first);
    for (i, &p0) in outline.iter().enumerate() {
        let p1 = outline[(i + 1) % outline.len()];
        path.quad_to(p0, p0.midpoint(p1));
    }
    path.close_path();
    path
}

fn stroke_radius(size: f64, thinning: f64, pressure: f64) -> f64 {
    size * (0.5 - thinning * (0.5 - pressure))
}

fn simulated_pressure(prev: f64, distance: f64, size: f64) -> f64 {
    let sp = (distance / size).min(1.0);
    let rp = (1.0 - sp).min(1.0);
    (prev + (rp - prev) * (sp * RATE_OF_PRESSURE_CHANGE)).min(1.0)
}

fn ease_out_quad(t: f64) -> f64 {
    t * (2.0 - t)
}

fn ease_out_cubic(t: f64) -> f64 {
    let t = t - 1.0;
    t * t * t + 1.0
}

fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

fn unit(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len < f64::EPSILON { Vec2::ZERO } else { v / len }
}

fn rotate_around(point: Point, center: Point, radians: f64) -> Point {
    let (sin, cos) = radians.sin_cos();
    let p = point - center;
    Point::new(center.x + p.x * cos - p.y * sin, center.y + p.x * sin + p.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    fn samples(points: &[(f64, f64, f64)]) -> Vec<StrokeSample> {
        points.iter().map(|&(x, y, p)| StrokeSample::new(x, y, p)).collect()
    }

    fn zigzag() -> Vec<StrokeSample> {
        (0..40)
            .map(|i| {
                let x = i as f64 * 4.0;
                let y = if i % 2 == 0 { 0.0 } else { 6.0 };
                StrokeSample::new(x, y, 0.5)
            })
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let options = StrokeOptions::default();
        assert!(stroke_points(&[], &options).is_empty());
        assert!(stroke_outline(&[], &options).is_empty());
        assert!(outline_to_path(&[]).elements().is_empty());
    }

    #[test]
    fn test_single_sample_is_a_capsule() {
        let options = StrokeOptions::default();
        let center = Point::new(10.0, 10.0);
        let outline = stroke_outline(&samples(&[(10.0, 10.0, 0.5)]), &options);
        assert!(outline.len() >= 3);
        for p in &outline {
            assert!(p.distance(center) <= options.size, "{p:?}");
        }

        let path = outline_to_path(&outline);
        assert!(matches!(path.elements().last(), Some(kurbo::PathEl::ClosePath)));
        assert!(path.bounding_box().contains(center));
    }

    #[test]
    fn test_two_samples_are_interpolated() {
        let options = StrokeOptions::default();
        let points = stroke_points(&samples(&[(0.0, 0.0, 0.5), (100.0, 0.0, 0.5)]), &options);
        assert!(points.len() > 2);
        assert!(points.windows(2).all(|w| w[1].point.x > w[0].point.x));
    }

    #[test]
    fn test_running_length_increases() {
        let options = StrokeOptions::default();
        let points = stroke_points(&zigzag(), &options);
        assert!(points
            .windows(2)
            .all(|w| w[1].running_length > w[0].running_length));
    }

    #[test]
    fn test_outline_is_deterministic() {
        let options = StrokeOptions::default();
        let input = zigzag();
        let a = stroke_outline(&input, &options);
        let b = stroke_outline(&input, &options);
        assert!(!a.is_empty());
        assert_eq!(a, b);
        assert_eq!(outline_to_path(&a).to_svg(), outline_to_path(&b).to_svg());
    }

    #[test]
    fn test_outline_surrounds_stroke() {
        let options = StrokeOptions::default();
        let input = samples(&[
            (0.0, 0.0, 0.5),
            (20.0, 0.0, 0.5),
            (40.0, 0.0, 0.5),
            (60.0, 0.0, 0.5),
            (80.0, 0.0, 0.5),
        ]);
        let outline = stroke_outline(&input, &options);
        let bounds = outline_to_path(&outline).bounding_box();
        assert!(bounds.y0 < 0.0 && bounds.y1 > 0.0);
        assert!(bounds.height() <= options.size + 1.0);
    }

    #[test]
    fn test_path_is_closed() {
        let outline = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let path = outline_to_path(&outline);
        // move + one quad per vertex + close
        assert_eq!(path.elements().len(), outline.len() + 2);
        assert!(path.to_svg().ends_with('Z'));
    }

    #[test]
    fn test_zero_size_gives_nothing() {
        let options = StrokeOptions {
            size: 0.0,
            ..StrokeOptions::default()
        };
        assert!(stroke_outline(&zigzag(), &options).is_empty());
    }
}
