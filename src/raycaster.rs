use glam::{IVec2, Vec2};
use rayon::iter::{IntoParallelIterator, ParallelExtend, ParallelIterator};

use crate::color::{Color, wall_color};
use crate::player::PlayerState;
use crate::world::GridMap;

/// Which grid line the ray crossed last before hitting a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Vertical,   // x-axis step, wall face runs along y
    Horizontal, // y-axis step, wall face runs along x
}

/// State of a single ray after its DDA walk finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySample {
    pub direction: Vec2,
    pub map: IVec2,       // cell that stopped the ray
    pub side_dist: Vec2,  // accumulated distance to the next x / y grid line
    pub delta_dist: Vec2, // distance between consecutive x / y grid lines
    pub step: IVec2,      // -1 or +1 per axis
    pub side: Side,
    pub wall: u8,
    pub perp_wall_dist: f32,
    pub steps: u32,
}

/// One vertical wall strip, rows inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceDescriptor {
    pub column: u32,
    pub draw_start: u32,
    pub draw_end: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Horizontal camera-space coordinate of `column`, -1 at the left edge.
    #[inline]
    pub fn camera_x(&self, column: u32) -> f32 {
        2.0 * column as f32 / self.width as f32 - 1.0
    }
}

#[inline]
fn delta_for(component: f32) -> f32 {
    // 1/0 is +inf in IEEE math; keep it explicit so -0.0 can't sneak a sign in
    if component == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / component).abs()
    }
}

/// Step sign and distance to the first grid line on one axis.
#[inline]
fn axis_start(dir: f32, pos: f32, cell: i32, delta: f32) -> (i32, f32) {
    let (step, to_line) = if dir < 0.0 {
        (-1, pos - cell as f32)
    } else {
        (1, cell as f32 + 1.0 - pos)
    };
    // an axis the ray never crosses stays at +inf (0 * inf would be NaN)
    let side = if delta.is_finite() {
        to_line * delta
    } else {
        f32::INFINITY
    };
    (step, side)
}

/// Walks the grid from the player along the ray at `camera_x` until it
/// enters a wall cell.
///
/// The grid's solid border guarantees termination; a ray that leaves the
/// grid means the map invariant was broken.
pub fn cast_ray(player: &PlayerState, grid: &GridMap, camera_x: f32) -> RaySample {
    let pos = player.position;
    let direction = player.direction + player.plane * camera_x;

    let mut map = IVec2::new(pos.x.floor() as i32, pos.y.floor() as i32);
    let delta_dist = Vec2::new(delta_for(direction.x), delta_for(direction.y));

    let (step_x, side_x) = axis_start(direction.x, pos.x, map.x, delta_dist.x);
    let (step_y, side_y) = axis_start(direction.y, pos.y, map.y, delta_dist.y);
    let step = IVec2::new(step_x, step_y);
    let mut side_dist = Vec2::new(side_x, side_y);

    let mut steps = 0u32;
    let (side, wall) = loop {
        // ties go to y
        let side = if side_dist.x < side_dist.y {
            side_dist.x += delta_dist.x;
            map.x += step.x;
            Side::Vertical
        } else {
            side_dist.y += delta_dist.y;
            map.y += step.y;
            Side::Horizontal
        };
        steps += 1;

        match grid.cell(map.x, map.y) {
            Some(0) => {}
            Some(id) => break (side, id),
            None => unreachable!("ray left a grid without a solid border at {map}"),
        }
    };

    // Distance to the camera plane, not the player, to avoid fish-eye.
    let perp_wall_dist = match side {
        Side::Vertical => (map.x as f32 - pos.x + ((1 - step.x) / 2) as f32) / direction.x,
        Side::Horizontal => (map.y as f32 - pos.y + ((1 - step.y) / 2) as f32) / direction.y,
    };

    RaySample {
        direction,
        map,
        side_dist,
        delta_dist,
        step,
        side,
        wall,
        perp_wall_dist,
        steps,
    }
}

/// Projected height in rows of a wall `perp_wall_dist` away.
#[inline]
pub fn line_height(perp_wall_dist: f32, screen_height: u32) -> i32 {
    // A player standing on a wall face gets -0.0 here. Dropping the sign sends
    // both zeros to +inf, which `as` saturates to i32::MAX.
    (screen_height as f32 / perp_wall_dist.abs()) as i32
}

pub fn cast_column(
    player: &PlayerState,
    grid: &GridMap,
    column: u32,
    viewport: Viewport,
) -> SliceDescriptor {
    let ray = cast_ray(player, grid, viewport.camera_x(column));

    let h = viewport.height as i32;
    let max_row = (h - 1).max(0);
    let line = line_height(ray.perp_wall_dist, viewport.height);
    let draw_start = (-line / 2 + h / 2).clamp(0, max_row);
    let draw_end = (line / 2 + h / 2).clamp(0, max_row);

    SliceDescriptor {
        column,
        draw_start: draw_start as u32,
        draw_end: draw_end as u32,
        color: wall_color(ray.wall, ray.side == Side::Horizontal),
    }
}

/// Casts every column of `viewport` into `out`, left to right.
pub fn cast_frame(
    player: &PlayerState,
    grid: &GridMap,
    viewport: Viewport,
    out: &mut Vec<SliceDescriptor>,
) {
    out.clear();
    out.extend((0..viewport.width).map(|x| cast_column(player, grid, x, viewport)));
}

/// Same as [`cast_frame`], with columns spread across the rayon pool.
pub fn cast_frame_par(
    player: &PlayerState,
    grid: &GridMap,
    viewport: Viewport,
    out: &mut Vec<SliceDescriptor>,
) {
    out.clear();
    out.par_extend(
        (0..viewport.width)
            .into_par_iter()
            .map(|x| cast_column(player, grid, x, viewport)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    fn facing(position: Vec2, direction: Vec2) -> PlayerState {
        PlayerState {
            position,
            direction,
            plane: direction.perp() * -0.66,
        }
    }

    #[test]
    fn center_column_hits_west_border() {
        let grid = GridMap::default();
        let player = PlayerState::default();
        assert_eq!(VIEW.camera_x(400), 0.0);

        let ray = cast_ray(&player, &grid, VIEW.camera_x(400));
        assert_eq!(ray.direction, Vec2::new(-1.0, 0.0));
        assert_eq!(ray.side, Side::Vertical);
        assert_eq!(ray.map, IVec2::new(0, 3));
        assert_eq!(ray.step.x, -1);
        assert_eq!(ray.steps, 3);
        assert!((ray.perp_wall_dist - 2.5).abs() < 1e-6);
        assert!(ray.delta_dist.y.is_infinite());

        let slice = cast_column(&player, &grid, 400, VIEW);
        assert_eq!(line_height(ray.perp_wall_dist, 600), 240);
        assert_eq!(
            slice,
            SliceDescriptor {
                column: 400,
                draw_start: 180,
                draw_end: 420,
                color: wall_color(1, false),
            }
        );
    }

    #[test]
    fn zero_x_component_never_crosses_x() {
        let grid = GridMap::default();
        // position sits exactly on an x grid line
        for x in [3.5, 3.0] {
            let player = facing(Vec2::new(x, 3.5), Vec2::new(0.0, 1.0));
            let ray = cast_ray(&player, &grid, 0.0);
            assert_eq!(ray.direction.x, 0.0);
            assert!(ray.side_dist.x.is_infinite());
            assert_eq!(ray.side, Side::Horizontal);
            assert_eq!(ray.map, IVec2::new(3, 7));
            assert!((ray.perp_wall_dist - 3.5).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_y_component_never_crosses_y() {
        let grid = GridMap::default();
        let player = facing(Vec2::new(6.5, 1.0), Vec2::new(-1.0, 0.0));
        let ray = cast_ray(&player, &grid, 0.0);
        assert!(ray.side_dist.y.is_infinite());
        assert_eq!(ray.side, Side::Vertical);
        assert_eq!(ray.map, IVec2::new(0, 1));
        assert_eq!(ray.steps, 6);
        assert!((ray.perp_wall_dist - 5.5).abs() < 1e-6);
    }

    #[test]
    fn horizontal_face_is_darker() {
        let grid = GridMap::default();
        let player = facing(Vec2::new(3.5, 3.5), Vec2::new(0.0, 1.0));
        let slice = cast_column(&player, &grid, 400, VIEW);
        assert_eq!(slice.color, wall_color(1, true));
    }

    #[test]
    fn rays_terminate_within_grid_bounds() {
        let grid = GridMap::default();
        let limit = (grid.width() + grid.height()) as u32;

        for x in 0..grid.width() as i32 {
            for y in 0..grid.height() as i32 {
                if !grid.is_open(x, y) {
                    continue;
                }
                for (ox, oy) in [(0.5, 0.5), (0.25, 0.75), (0.9, 0.1)] {
                    let position = Vec2::new(x as f32 + ox, y as f32 + oy);
                    for i in 0..72 {
                        let angle = i as f32 * std::f32::consts::TAU / 72.0;
                        let player = facing(position, Vec2::from_angle(angle));
                        for camera_x in [-1.0, -0.37, 0.0, 0.81] {
                            let ray = cast_ray(&player, &grid, camera_x);
                            assert!(ray.steps <= limit, "{position} {angle}: {} steps", ray.steps);
                            assert!(ray.perp_wall_dist > 0.0, "{position} {angle}");
                            assert_ne!(grid.cell(ray.map.x, ray.map.y), Some(0));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn farther_walls_are_shorter() {
        let mut prev = i32::MAX;
        for i in 1..400 {
            let h = line_height(i as f32 * 0.05, 600);
            assert!(h <= prev);
            prev = h;
        }
        assert_eq!(line_height(0.0, 600), i32::MAX);
        assert_eq!(line_height(-0.0, 600), i32::MAX);
    }

    #[test]
    fn close_wall_fills_column() {
        let grid = GridMap::default();
        let player = PlayerState {
            position: Vec2::new(1.5, 1.5),
            ..PlayerState::default()
        };
        let slice = cast_column(&player, &grid, 400, VIEW);
        assert_eq!((slice.draw_start, slice.draw_end), (0, 599));
    }

    #[test]
    fn standing_on_wall_face_fills_column() {
        let grid = GridMap::default();
        let cases = [
            (Vec2::new(1.0, 3.5), Vec2::new(-1.0, 0.0), Side::Vertical),
            (Vec2::new(3.5, 1.0), Vec2::new(0.0, -1.0), Side::Horizontal),
        ];
        for (position, direction, side) in cases {
            let player = facing(position, direction);
            let ray = cast_ray(&player, &grid, 0.0);
            assert_eq!(ray.side, side);
            assert_eq!(ray.perp_wall_dist, 0.0, "{position}");

            let slice = cast_column(&player, &grid, 400, VIEW);
            assert!(slice.draw_start <= slice.draw_end, "{position}");
            assert_eq!((slice.draw_start, slice.draw_end), (0, 599), "{position}");

            let mut out = Vec::new();
            cast_frame(&player, &grid, VIEW, &mut out);
            assert!(out.iter().all(|s| s.draw_start <= s.draw_end), "{position}");
        }
    }

    #[test]
    fn slices_stay_on_screen() {
        let grid = GridMap::default();
        let mut out = Vec::new();
        cast_frame(&PlayerState::default(), &grid, VIEW, &mut out);
        assert_eq!(out.len(), 800);
        for (i, s) in out.iter().enumerate() {
            assert_eq!(s.column, i as u32);
            assert!(s.draw_start <= s.draw_end);
            assert!(s.draw_end < VIEW.height);
        }
    }

    #[test]
    fn parallel_cast_matches_sequential() {
        let grid = GridMap::default();
        let player = PlayerState::default().rotated(0.7);
        let mut seq = Vec::new();
        // stale contents must be replaced, not appended to
        let mut par = vec![SliceDescriptor {
            column: 9,
            draw_start: 0,
            draw_end: 0,
            color: 0,
        }];
        cast_frame(&player, &grid, VIEW, &mut seq);
        cast_frame_par(&player, &grid, VIEW, &mut par);
        assert_eq!(seq, par);
    }

    #[test]
    fn degenerate_viewport_does_not_panic() {
        let grid = GridMap::default();
        let mut out = Vec::new();
        let flat = Viewport {
            width: 4,
            height: 0,
        };
        cast_frame(&PlayerState::default(), &grid, flat, &mut out);
        assert!(out.iter().all(|s| s.draw_start == 0 && s.draw_end == 0));
    }
}
