//! First-person view of a tile grid, rendered one wall slice per screen
//! column with DDA ray casting.
//!
//! Everything here is platform free; the window and event loop live in the
//! binary and talk to the core through [`surface::Surface`].

pub mod color;
pub mod frame;
pub mod player;
pub mod raycaster;
pub mod settings;
pub mod surface;
pub mod world;
