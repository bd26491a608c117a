//! What the session controller needs from a physics/render engine.
//!
//! Actors live inside the host; the controller only holds their handles and
//! routes every velocity or text change through [`Host`].

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// The other side of an overlap or collider: one actor or a whole group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Actor(ActorId),
    Group(GroupId),
}

impl From<ActorId> for Target {
    fn from(id: ActorId) -> Self {
        Target::Actor(id)
    }
}

impl From<GroupId> for Target {
    fn from(id: GroupId) -> Self {
        Target::Group(id)
    }
}

/// Queued by the host for every physics step in which a registered overlap
/// holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    Ground,
    Column,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    pub fn scaled(self, s: f32) -> Self {
        Self::new(self.w * s, self.h * s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Origin {
    pub x: f32,
    pub y: f32,
}

impl Origin {
    pub const TOP_LEFT: Origin = Origin { x: 0.0, y: 0.0 };
    pub const CENTER: Origin = Origin { x: 0.5, y: 0.5 };
}

/// Members at `x + i * step_x, y` for `i in 0..count`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupLayout {
    pub count: usize,
    pub x: f32,
    pub y: f32,
    pub step_x: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSpec {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub bounce: f32,
    pub collide_world_bounds: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_family: &'static str,
    pub font_size: u16,
    pub color: Rgb,
    pub background: Rgb,
}

/// Input state polled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pub start: bool,
    pub ascend: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    UnknownAsset(String),
    UnknownActor(ActorId),
    UnknownGroup(GroupId),
    UnknownText(TextId),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::UnknownAsset(key) => write!(f, "asset '{key}' was never loaded"),
            HostError::UnknownActor(id) => write!(f, "no actor with handle {}", id.0),
            HostError::UnknownGroup(id) => write!(f, "no group with handle {}", id.0),
            HostError::UnknownText(id) => write!(f, "no text object with handle {}", id.0),
        }
    }
}

impl std::error::Error for HostError {}

pub trait Host {
    fn load_image(&mut self, key: &str, size: Size) -> Result<(), HostError>;
    fn load_spritesheet(&mut self, key: &str, frame: Size) -> Result<(), HostError>;

    /// Non-physical image.
    fn add_image(&mut self, key: &str, x: f32, y: f32, origin: Origin)
    -> Result<ActorId, HostError>;
    /// Immovable body.
    fn add_static(&mut self, key: &str, x: f32, y: f32, scale: f32) -> Result<ActorId, HostError>;
    fn add_static_group(&mut self, key: &str, layout: GroupLayout) -> Result<GroupId, HostError>;
    /// Body moved by gravity and velocity.
    fn add_sprite(&mut self, key: &str, spec: SpriteSpec) -> Result<ActorId, HostError>;

    fn add_overlap(
        &mut self,
        actor: ActorId,
        other: Target,
        contact: Contact,
    ) -> Result<(), HostError>;
    fn add_collider(&mut self, actor: ActorId, other: Target) -> Result<(), HostError>;

    fn add_text(&mut self, text: &str, style: TextStyle) -> TextId;
    /// Anchors `text` at the bottom centre of `within`, `offset_y` units inside.
    fn align_bottom_center(
        &mut self,
        text: TextId,
        within: ActorId,
        offset_y: f32,
    ) -> Result<(), HostError>;
    fn set_text(&mut self, text: TextId, value: &str);

    fn set_velocity_x(&mut self, actor: ActorId, vx: f32);
    fn set_velocity_y(&mut self, actor: ActorId, vy: f32);
    fn position(&self, actor: ActorId) -> (f32, f32);

    /// Contacts queued since the last call, in the order they occurred.
    fn drain_contacts(&mut self) -> Vec<Contact>;
}
