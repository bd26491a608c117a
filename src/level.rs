//! The one fixed level: layout, physics constants and player messages.

use crate::host::Size;

// ── World ───────────────────────────────────────────────────────────────────

pub const WORLD_W: f32 = 800.0;
pub const WORLD_H: f32 = 600.0;
pub const GRAVITY: f32 = 300.0; // units/s², downward

// ── Bird motion ─────────────────────────────────────────────────────────────

pub const ASCEND_VY: f32 = -160.0;
pub const FORWARD_VX: f32 = 50.0;
pub const WIN_DESCEND_VY: f32 = 40.0;
pub const FINISH_X: f32 = 750.0;

// ── Assets ──────────────────────────────────────────────────────────────────

pub const BACKGROUND: &str = "background";
pub const ROAD: &str = "road";
pub const COLUMN: &str = "column";
pub const BIRD: &str = "bird";

pub const BACKGROUND_SIZE: Size = Size::new(800.0, 600.0);
pub const ROAD_SIZE: Size = Size::new(400.0, 32.0);
pub const COLUMN_SIZE: Size = Size::new(48.0, 400.0);
pub const BIRD_FRAME: Size = Size::new(64.0, 96.0);
/// Hit box of the bird inside one spritesheet frame, before scaling.
pub const BIRD_BODY: Size = Size::new(24.0, 16.0);

// ── Layout ──────────────────────────────────────────────────────────────────

pub const ROAD_X: f32 = 400.0;
pub const ROAD_Y: f32 = 568.0;
pub const ROAD_SCALE: f32 = 2.0;

pub const COLUMNS_PER_GROUP: usize = 2;
pub const COLUMN_STEP_X: f32 = 300.0;
pub const TOP_COLUMNS_X: f32 = 200.0;
pub const TOP_COLUMNS_Y: f32 = 0.0;
pub const BOTTOM_COLUMNS_X: f32 = 350.0;
pub const BOTTOM_COLUMNS_Y: f32 = 400.0;

pub const BIRD_START_X: f32 = 0.0;
pub const BIRD_START_Y: f32 = 50.0;
pub const BIRD_SCALE: f32 = 2.0;
pub const BIRD_BOUNCE: f32 = 0.2;

// ── Message overlay ─────────────────────────────────────────────────────────

pub const MESSAGE_FONT: &str = "\"Comic Sans MS\", Times, serif";
pub const MESSAGE_FONT_SIZE: u16 = 20;
pub const MESSAGE_OFFSET_Y: f32 = 50.0;

pub const MSG_INSTRUCTIONS: &str = "Instructions: Press space bar to start";
pub const MSG_IN_FLIGHT: &str =
    "Instructions: Press the \"^\" button to stay upright\nAnd don't hit the columns or ground";
pub const MSG_CRASHED: &str = "Oh no! You crashed!";
pub const MSG_WON: &str = "Congrats! You won!";
