use crate::color::{BLACK, GRAY, RAYWHITE};
use crate::player::{InputState, Movement, MovementError, PlayerState};
use crate::raycaster::{SliceDescriptor, Viewport, cast_frame, cast_frame_par};
use crate::settings::Settings;
use crate::surface::Surface;
use crate::world::GridMap;

const TEXT_SIZE: u32 = 20;

/// Owns the world and player and runs one frame at a time:
/// move, clear, cast, draw slices, overlay.
pub struct FrameDriver {
    grid: GridMap,
    player: PlayerState,
    movement: Movement,
    slices: Vec<SliceDescriptor>, // reused between frames
    parallel: bool,
    debug_overlay: bool,
}

impl FrameDriver {
    pub fn new(
        grid: GridMap,
        player: PlayerState,
        settings: &Settings,
    ) -> Result<Self, MovementError> {
        Ok(Self {
            grid,
            player,
            movement: settings.movement()?,
            slices: Vec::with_capacity(settings.width as usize),
            parallel: settings.parallel_columns,
            debug_overlay: settings.debug_overlay,
        })
    }

    #[inline]
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Slices produced by the last frame.
    #[inline]
    pub fn slices(&self) -> &[SliceDescriptor] {
        &self.slices
    }

    pub fn frame<S: Surface + ?Sized>(
        &mut self,
        input: InputState,
        dt: f32,
        viewport: Viewport,
        surface: &mut S,
    ) {
        // movement has to land before the cast reads the player
        self.player = self.movement.step(self.player, input, dt, &self.grid);

        surface.clear(BLACK);
        if viewport.is_empty() {
            self.slices.clear();
            return;
        }

        if self.parallel {
            cast_frame_par(&self.player, &self.grid, viewport, &mut self.slices);
        } else {
            cast_frame(&self.player, &self.grid, viewport, &mut self.slices);
        }

        for slice in &self.slices {
            surface.draw_vertical_line(slice.column, slice.draw_start, slice.draw_end, slice.color);
        }

        if self.debug_overlay {
            let p = &self.player;
            let pos = format!("POS: ({:.2}, {:.2})", p.position.x, p.position.y);
            let dir = format!("DIR: ({:.2}, {:.2})", p.direction.x, p.direction.y);
            surface.draw_text(&pos, 10, 10, TEXT_SIZE, RAYWHITE);
            surface.draw_text(&dir, 10, 40, TEXT_SIZE, RAYWHITE);
            surface.draw_text("Use WASD to move and rotate", 10, 70, TEXT_SIZE, GRAY);
        }
    }
}
