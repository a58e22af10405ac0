use glam::Vec2;
use thiserror::Error;

use crate::world::GridMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub position: Vec2,  // (x, y) in grid cells
    pub direction: Vec2, // facing
    pub plane: Vec2,     // camera plane, perpendicular to direction; its length sets the FOV
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec2::new(3.5, 3.5),
            direction: Vec2::new(-1.0, 0.0), // facing -X
            plane: Vec2::new(0.0, 0.66),
        }
    }
}

impl PlayerState {
    /// Rotates both the facing direction and the camera plane by `angle` radians.
    pub fn rotated(self, angle: f32) -> Self {
        Self {
            direction: rotate(self.direction, angle),
            plane: rotate(self.plane, angle),
            ..self
        }
    }
}

#[inline]
fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    // both components read the pre-rotation x
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Movement keys held during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MovementError {
    #[error("max_frame_time {0} must be positive and finite")]
    FrameTime(f32),

    #[error("move_speed * max_frame_time = {0} must be below one cell")]
    Tunnelling(f32),

    #[error("rot_speed {0} must be finite")]
    RotSpeed(f32),
}

/// Speeds for [`Movement::step`]. A single frame never moves the player a
/// full cell, so the wall check cannot be skipped over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    move_speed: f32,     // cells/s
    rot_speed: f32,      // rad/s
    max_frame_time: f32, // seconds
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            rot_speed: 1.5,
            max_frame_time: 0.1,
        }
    }
}

impl Movement {
    pub fn new(
        move_speed: f32,
        rot_speed: f32,
        max_frame_time: f32,
    ) -> Result<Self, MovementError> {
        if !(max_frame_time > 0.0 && max_frame_time.is_finite()) {
            return Err(MovementError::FrameTime(max_frame_time));
        }
        let max_step = move_speed * max_frame_time;
        if !(max_step.is_finite() && max_step.abs() < 1.0) {
            return Err(MovementError::Tunnelling(max_step));
        }
        if !rot_speed.is_finite() {
            return Err(MovementError::RotSpeed(rot_speed));
        }
        Ok(Self {
            move_speed,
            rot_speed,
            max_frame_time,
        })
    }

    #[inline]
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Advances `state` by one frame of `dt` seconds.
    ///
    /// Translation is checked against the grid one axis at a time, so a
    /// player walking diagonally into a wall slides along it instead of
    /// stopping. Rotate-left turns by `+rot_speed * dt`, rotate-right by the
    /// negated angle.
    pub fn step(
        &self,
        state: PlayerState,
        input: InputState,
        dt: f32,
        grid: &GridMap,
    ) -> PlayerState {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.max_frame_time)
        } else {
            0.0
        };
        let move_step = self.move_speed * dt;
        let rot_step = self.rot_speed * dt;

        let mut state = state;
        if input.forward {
            state.position = slide(state.position, state.direction * move_step, grid);
        }
        if input.backward {
            state.position = slide(state.position, -state.direction * move_step, grid);
        }
        if input.rotate_left {
            state = state.rotated(rot_step);
        }
        if input.rotate_right {
            state = state.rotated(-rot_step);
        }
        state
    }
}

fn slide(pos: Vec2, delta: Vec2, grid: &GridMap) -> Vec2 {
    let mut pos = pos;
    if grid.is_open((pos.x + delta.x).floor() as i32, pos.y.floor() as i32) {
        pos.x += delta.x;
    }
    // y check sees the x that was just applied
    if grid.is_open(pos.x.floor() as i32, (pos.y + delta.y).floor() as i32) {
        pos.y += delta.y;
    }
    pos
}
