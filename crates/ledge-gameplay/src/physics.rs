//! Rectangle-vs-rectangle collision resolution.
//!
//! A moving box is pushed out of static boxes one at a time using the
//! minimum translation vector of each overlap. Obstacles are visited in the
//! order they are stored, and each step sees the box already corrected by
//! the previous ones, so the result depends on obstacle order when several
//! overlaps happen in the same tick.

use ledge_common::{Aabb, Vec2};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Axis along which an overlap was separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal push
    X,
    /// Vertical push
    Y,
}

/// Outcome of resolving one mover against a set of obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Resolution {
    /// Corrected top-left position of the mover
    pub position: Vec2,
    /// Whether a downward move was stopped along Y this tick
    pub grounded: bool,
    /// Total displacement applied to the mover
    pub correction: Vec2,
    /// Number of obstacles that pushed the mover
    pub contacts: u32,
}

/// Signed penetration depth of `a` into `b`.
///
/// Each component is the distance `a` must move along that axis to stop
/// overlapping, pointing away from `b`. Returns zero when the boxes do not
/// overlap on both axes; boxes that only touch are not overlapping.
#[must_use]
pub fn intersection_depth(a: &Aabb, b: &Aabb) -> Vec2 {
    let min_distance = a.half_extents() + b.half_extents();
    let distance = a.center() - b.center();

    if distance.x.abs() >= min_distance.x || distance.y.abs() >= min_distance.y {
        return Vec2::ZERO;
    }

    let depth_x = if distance.x > 0.0 {
        min_distance.x - distance.x
    } else {
        -min_distance.x - distance.x
    };
    let depth_y = if distance.y > 0.0 {
        min_distance.y - distance.y
    } else {
        -min_distance.y - distance.y
    };

    Vec2::new(depth_x, depth_y)
}

/// Picks the axis with the shallower penetration. X wins ties.
#[must_use]
pub fn separating_axis(depth: Vec2) -> Axis {
    if depth.y.abs() < depth.x.abs() {
        Axis::Y
    } else {
        Axis::X
    }
}

/// Pushes `mover` out of a single obstacle.
///
/// Returns the corrected box and the axis used, or `None` when the boxes do
/// not overlap.
#[must_use]
pub fn resolve_one(mover: Aabb, obstacle: &Aabb) -> Option<(Aabb, Axis)> {
    let depth = intersection_depth(&mover, obstacle);
    if depth == Vec2::ZERO {
        return None;
    }

    let axis = separating_axis(depth);
    let push = match axis {
        Axis::X => Vec2::new(depth.x, 0.0),
        Axis::Y => Vec2::new(0.0, depth.y),
    };
    Some((mover.translated(push), axis))
}

/// Resolves a moving box against static obstacles.
///
/// `velocity` is the mover's velocity for this tick; a push along Y while
/// moving down (`velocity.y > 0`) marks the result as grounded. Once set,
/// grounded stays set for the rest of the pass.
#[must_use]
pub fn resolve<I>(mover: Aabb, velocity: Vec2, obstacles: I) -> Resolution
where
    I: IntoIterator<Item = Aabb>,
{
    let start = mover.origin();
    let (resolved, grounded, contacts) = obstacles.into_iter().fold(
        (mover, false, 0_u32),
        |(bounds, grounded, contacts), obstacle| match resolve_one(bounds, &obstacle) {
            Some((corrected, axis)) => {
                let landed = axis == Axis::Y && velocity.y > 0.0;
                trace!(
                    "Pushed out of ({}, {}) along {:?}, landed={}",
                    obstacle.x,
                    obstacle.y,
                    axis,
                    landed
                );
                (corrected, grounded || landed, contacts + 1)
            },
            None => (bounds, grounded, contacts),
        },
    );

    Resolution {
        position: resolved.origin(),
        grounded,
        correction: resolved.origin() - start,
        contacts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn platform() -> Aabb {
        Aabb::new(0.0, 140.0, 400.0, 32.0)
    }

    #[test]
    fn test_depth_zero_when_apart() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(50.0, 50.0, 10.0, 10.0);
        assert_eq!(intersection_depth(&a, &b), Vec2::ZERO);
    }

    #[test]
    fn test_depth_zero_when_touching() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
        assert_eq!(intersection_depth(&a, &right), Vec2::ZERO);
        assert_eq!(intersection_depth(&a, &below), Vec2::ZERO);
    }

    #[test]
    fn test_depth_points_away_from_obstacle() {
        // Mover sinks 4px into the top of the platform.
        let mover = Aabb::new(100.0, 104.0, 32.0, 40.0);
        let depth = intersection_depth(&mover, &platform());
        assert_eq!(depth.y, -4.0);
        assert!(depth.x.abs() > depth.y.abs());
    }

    #[test]
    fn test_separating_axis_prefers_x_on_tie() {
        assert_eq!(separating_axis(Vec2::new(3.0, -3.0)), Axis::X);
        assert_eq!(separating_axis(Vec2::new(3.0, 2.0)), Axis::Y);
        assert_eq!(separating_axis(Vec2::new(-1.0, 2.0)), Axis::X);
    }

    #[test]
    fn test_landing_sets_grounded() {
        let mover = Aabb::new(100.0, 134.0, 32.0, 40.0);
        let result = resolve(mover, Vec2::new(0.0, 340.0), [platform()]);

        assert!(result.grounded);
        assert_eq!(result.position, Vec2::new(100.0, 100.0));
        assert_eq!(result.correction, Vec2::new(0.0, -34.0));
        assert_eq!(result.contacts, 1);
    }

    #[test]
    fn test_ceiling_hit_is_not_grounded() {
        let ceiling = Aabb::new(0.0, 0.0, 400.0, 32.0);
        let mover = Aabb::new(100.0, 28.0, 32.0, 40.0);
        let result = resolve(mover, Vec2::new(0.0, -300.0), [ceiling]);

        assert!(!result.grounded);
        assert_eq!(result.position, Vec2::new(100.0, 32.0));
    }

    #[test]
    fn test_wall_push_is_never_grounded() {
        let wall = Aabb::new(200.0, 0.0, 32.0, 400.0);
        let mover = Aabb::new(172.0, 100.0, 32.0, 40.0);
        let result = resolve(mover, Vec2::new(500.0, 200.0), [wall]);

        assert!(!result.grounded);
        assert_eq!(result.position, Vec2::new(168.0, 100.0));
    }

    #[test]
    fn test_sequential_relaxation_sees_corrected_box() {
        // The first obstacle pushes the mover up and out of the second one.
        let floor = Aabb::new(0.0, 140.0, 400.0, 32.0);
        let step = Aabb::new(120.0, 141.0, 40.0, 10.0);
        let mover = Aabb::new(100.0, 105.0, 32.0, 40.0);

        let result = resolve(mover, Vec2::new(0.0, 100.0), [floor, step]);
        assert_eq!(result.position, Vec2::new(100.0, 100.0));
        assert_eq!(result.contacts, 1);
        assert!(result.grounded);
    }

    #[test]
    fn test_grounded_survives_later_side_push() {
        let floor = platform();
        let wall = Aabb::new(130.0, 0.0, 32.0, 130.0);
        let mover = Aabb::new(100.0, 102.0, 32.0, 40.0);

        let result = resolve(mover, Vec2::new(50.0, 50.0), [floor, wall]);
        assert!(result.grounded);
        assert_eq!(result.contacts, 2);
        assert_eq!(result.position, Vec2::new(98.0, 100.0));
    }

    #[test]
    fn test_no_obstacles() {
        let mover = Aabb::new(5.0, 6.0, 32.0, 40.0);
        let result = resolve(mover, Vec2::new(0.0, 100.0), std::iter::empty());
        assert_eq!(result.position, Vec2::new(5.0, 6.0));
        assert!(!result.grounded);
        assert_eq!(result.contacts, 0);
    }

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (-200i32..200, -200i32..200, 1i32..80, 1i32..80).prop_map(|(x, y, w, h)| {
            Aabb::new(x as f32, y as f32, w as f32, h as f32)
        })
    }

    fn overlapping_pair() -> impl Strategy<Value = (Aabb, Aabb)> {
        (arb_box(), 1i32..80, 1i32..80).prop_flat_map(|(a, w, h)| {
            let (ax, ay) = (a.x as i32, a.y as i32);
            let (aw, ah) = (a.width as i32, a.height as i32);
            ((ax - w + 1)..(ax + aw), (ay - h + 1)..(ay + ah)).prop_map(move |(x, y)| {
                (a, Aabb::new(x as f32, y as f32, w as f32, h as f32))
            })
        })
    }

    proptest! {
        #[test]
        fn prop_disjoint_boxes_are_untouched(a in arb_box(), b in arb_box(), vy in -600.0f32..600.0) {
            prop_assume!(!a.overlaps(&b));
            let result = resolve(a, Vec2::new(0.0, vy), [b]);
            prop_assert_eq!(result.correction, Vec2::ZERO);
            prop_assert!(!result.grounded);
        }

        #[test]
        fn prop_overlap_is_separated_on_one_axis((a, b) in overlapping_pair(), vy in -600.0f32..600.0) {
            prop_assert!(a.overlaps(&b));
            let (corrected, axis) = resolve_one(a, &b).expect("overlapping boxes resolve");

            prop_assert!(!corrected.overlaps(&b));
            match axis {
                Axis::X => prop_assert_eq!(corrected.y, a.y),
                Axis::Y => prop_assert_eq!(corrected.x, a.x),
            }

            let result = resolve(a, Vec2::new(0.0, vy), [b]);
            prop_assert_eq!(result.grounded, axis == Axis::Y && vy > 0.0);
        }
    }
}
