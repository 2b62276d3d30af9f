//! # Radial Solver
//!
//! Places children around a circle of fixed radius, spaced evenly across
//! the configured angle range. Children keep their own size and get a
//! centered point anchor; face-outward mode additionally rotates each
//! child along its angular position.

use crate::model::Vec2;
use crate::style::RadialConfig;

use super::{ChildBox, ChildSpec, SolveOutput};

pub fn solve(cfg: &RadialConfig, size: Vec2, children: &[ChildSpec]) -> SolveOutput {
    let n = children.len();
    if n == 0 {
        return SolveOutput::empty();
    }

    let center = Vec2::new(size.x / 2.0, size.y / 2.0);
    let step = (cfg.end_angle - cfg.start_angle) / n as f32;

    let boxes = children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let angle = cfg.start_angle + step * i as f32;
            let radians = angle.to_radians();
            // Solver space has Y growing downward; angles are measured
            // counter-clockwise with screen-up positive.
            let position = Vec2::new(
                center.x + cfg.radius * radians.cos(),
                center.y - cfg.radius * radians.sin(),
            );
            let origin = Vec2::new(
                position.x - child.size.x / 2.0,
                position.y - child.size.y / 2.0,
            );
            ChildBox {
                offset: origin,
                size: child.size,
                write_width: false,
                write_height: false,
                // Zero rotation keeps an upright child facing outward at
                // the twelve o'clock position.
                rotation: cfg.face_outward.then_some(angle - 90.0),
            }
        })
        .collect();

    SolveOutput {
        boxes,
        container_size: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn cfg(radius: f32) -> RadialConfig {
        RadialConfig {
            radius,
            ..Default::default()
        }
    }

    #[test]
    fn four_children_land_on_the_compass_points() {
        let children = vec![
            ChildSpec::new(10.0, 10.0),
            ChildSpec::new(10.0, 10.0),
            ChildSpec::new(10.0, 10.0),
            ChildSpec::new(10.0, 10.0),
        ];
        let out = solve(&cfg(50.0), Vec2::new(200.0, 200.0), &children);
        let centers: Vec<Vec2> = out
            .boxes
            .iter()
            .map(|b| Vec2::new(b.offset.x + 5.0, b.offset.y + 5.0))
            .collect();
        // 0°, 90°, 180°, 270° around (100, 100).
        assert!((centers[0].x - 150.0).abs() < EPS && (centers[0].y - 100.0).abs() < EPS);
        assert!((centers[1].x - 100.0).abs() < EPS && (centers[1].y - 50.0).abs() < EPS);
        assert!((centers[2].x - 50.0).abs() < EPS && (centers[2].y - 100.0).abs() < EPS);
        assert!((centers[3].x - 100.0).abs() < EPS && (centers[3].y - 150.0).abs() < EPS);
    }

    #[test]
    fn children_keep_their_own_size() {
        let out = solve(&cfg(30.0), Vec2::new(100.0, 100.0), &[ChildSpec::new(24.0, 16.0)]);
        assert_eq!(out.boxes[0].size, Vec2::new(24.0, 16.0));
        assert!(!out.boxes[0].write_width);
        assert!(!out.boxes[0].write_height);
    }

    #[test]
    fn face_outward_rotates_along_the_angle() {
        let config = RadialConfig {
            radius: 50.0,
            face_outward: true,
            ..Default::default()
        };
        let children = vec![ChildSpec::new(4.0, 4.0), ChildSpec::new(4.0, 4.0)];
        let out = solve(&config, Vec2::new(100.0, 100.0), &children);
        assert!((out.boxes[0].rotation.unwrap() + 90.0).abs() < EPS);
        assert!((out.boxes[1].rotation.unwrap() - 90.0).abs() < EPS);
    }

    #[test]
    fn angle_range_limits_the_arc() {
        let config = RadialConfig {
            radius: 100.0,
            start_angle: 0.0,
            end_angle: 180.0,
            ..Default::default()
        };
        let children = vec![ChildSpec::new(2.0, 2.0), ChildSpec::new(2.0, 2.0)];
        let out = solve(&config, Vec2::new(0.0, 0.0), &children);
        // Steps of 90°: children at 0° and 90°, none past the half circle.
        assert!((out.boxes[0].offset.x - 99.0).abs() < EPS);
        assert!((out.boxes[1].offset.y + 101.0).abs() < EPS);
    }
}
