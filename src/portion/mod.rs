//! Portion Stack Planning
//!
//! Turns a parsed serving quantity and a surface raycast hit into placement
//! data for the AR collaborator: one unit cube per whole unit of the serving,
//! stacked on the hit point, each spawned above its resting slot so it can
//! drop into place with a cascading delay. Placements are pure data; the
//! renderer schedules the drops fire-and-forget, and abandoning the screen
//! discards whatever has not played yet.

pub mod color;

pub use color::{stack_color, Rgba, RAINBOW};

use serde::{Deserialize, Serialize};

use crate::scene::{Pose, RaycastHit};

/// Geometry and timing of the portion stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortionSettings {
    /// Edge length of one unit cube, in meters
    pub cube_size_m: f32,
    /// How far above its resting slot a cube spawns, in meters
    pub initial_height_m: f32,
    /// Extra drop delay per cube index, in milliseconds
    pub cascade_step_ms: u64,
    /// Duration of each cube's drop animation, in milliseconds
    pub drop_duration_ms: u64,
    /// Text label attached to every cube
    pub unit_label: String,
}

impl Default for PortionSettings {
    fn default() -> Self {
        Self {
            cube_size_m: 0.01,
            initial_height_m: 0.5,
            cascade_step_ms: 200,
            drop_duration_ms: 250,
            unit_label: "1gr".to_string(),
        }
    }
}

/// One cube of the portion stack, ready for the AR collaborator to render
#[derive(Debug, Clone, PartialEq)]
pub struct CubePlacement {
    /// Position in the stack, bottom first
    pub index: usize,
    /// Where the cube appears before dropping
    pub spawn: Pose,
    /// Where the cube comes to rest
    pub rest: Pose,
    /// Cube tint along the rainbow gradient
    pub color: Rgba,
    /// Delay before this cube's drop starts
    pub delay_ms: u64,
    /// Label shown on the cube face
    pub label: String,
}

/// Plan the cube stack for a serving quantity anchored at a raycast hit.
///
/// The quantity is truncated toward zero, one cube per whole unit; quantities
/// below one produce an empty plan. The plan is bounded by the quantity, and
/// nothing downstream depends on the drops completing in order.
pub fn plan_stack(quantity: f32, hit: &RaycastHit, settings: &PortionSettings) -> Vec<CubePlacement> {
    let count = if quantity.is_finite() && quantity >= 1.0 {
        quantity.trunc() as usize
    } else {
        0
    };

    let base = hit.pose();
    (0..count)
        .map(|index| {
            let rest_y = base.y + index as f32 * settings.cube_size_m;
            CubePlacement {
                index,
                spawn: Pose::new(base.x, rest_y + settings.initial_height_m, base.z),
                rest: Pose::new(base.x, rest_y, base.z),
                color: stack_color(index, count),
                delay_ms: index as u64 * settings.cascade_step_ms,
                label: settings.unit_label.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_cube_per_whole_unit() {
        let plan = plan_stack(8.0, &RaycastHit::at(0.0, 0.0, 0.0), &PortionSettings::default());
        assert_eq!(plan.len(), 8);
    }

    #[test]
    fn test_quantity_truncates() {
        let plan = plan_stack(3.9, &RaycastHit::at(0.0, 0.0, 0.0), &PortionSettings::default());
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_sub_unit_quantity_yields_empty_plan() {
        let settings = PortionSettings::default();
        assert!(plan_stack(0.5, &RaycastHit::at(0.0, 0.0, 0.0), &settings).is_empty());
        assert!(plan_stack(0.0, &RaycastHit::at(0.0, 0.0, 0.0), &settings).is_empty());
    }

    #[test]
    fn test_cubes_stack_upward_from_hit() {
        let settings = PortionSettings::default();
        let plan = plan_stack(3.0, &RaycastHit::at(0.1, 0.7, -0.2), &settings);

        for (i, cube) in plan.iter().enumerate() {
            let expected_rest = 0.7 + i as f32 * settings.cube_size_m;
            assert!((cube.rest.y - expected_rest).abs() < 1e-6);
            assert!((cube.spawn.y - (expected_rest + settings.initial_height_m)).abs() < 1e-6);
            assert_eq!(cube.rest.x, 0.1);
            assert_eq!(cube.rest.z, -0.2);
        }
    }

    #[test]
    fn test_cascade_delays_increase_linearly() {
        let plan = plan_stack(4.0, &RaycastHit::at(0.0, 0.0, 0.0), &PortionSettings::default());
        let delays: Vec<u64> = plan.iter().map(|c| c.delay_ms).collect();
        assert_eq!(delays, vec![0, 200, 400, 600]);
    }

    #[test]
    fn test_gradient_spans_stack() {
        let plan = plan_stack(7.0, &RaycastHit::at(0.0, 0.0, 0.0), &PortionSettings::default());
        assert_eq!(plan.first().unwrap().color, RAINBOW[0]);
        assert_eq!(plan.last().unwrap().color, RAINBOW[6]);
    }

    #[test]
    fn test_cubes_carry_unit_label() {
        let plan = plan_stack(2.0, &RaycastHit::at(0.0, 0.0, 0.0), &PortionSettings::default());
        assert!(plan.iter().all(|c| c.label == "1gr"));
    }
}
