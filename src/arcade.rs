//! A small axis-aligned arcade physics world that plays the host role.

use std::collections::HashMap;

use crate::host::{
    ActorId, Contact, GroupId, GroupLayout, Host, HostError, Origin, Size, SpriteSpec, Target,
    TextId, TextStyle,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Asset {
    Image(Size),
    Sheet(Size),
}

impl Asset {
    fn size(self) -> Size {
        match self {
            Asset::Image(s) | Asset::Sheet(s) => s,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    None,
    Static,
    Dynamic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub cx: f32,
    pub cy: f32,
    pub hw: f32,
    pub hh: f32,
}

impl Rect {
    pub fn left(&self) -> f32 {
        self.cx - self.hw
    }

    pub fn top(&self) -> f32 {
        self.cy - self.hh
    }

    pub fn bottom(&self) -> f32 {
        self.cy + self.hh
    }

    /// Penetration depth along x and y; both positive when the boxes overlap.
    fn penetration(&self, other: &Rect) -> (f32, f32) {
        (
            self.hw + other.hw - (self.cx - other.cx).abs(),
            self.hh + other.hh - (self.cy - other.cy).abs(),
        )
    }

    fn intersects(&self, other: &Rect) -> bool {
        let (px, py) = self.penetration(other);
        px > 0.0 && py > 0.0
    }
}

pub struct Actor {
    pub key: String,
    pub kind: BodyKind,
    /// Centre.
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Drawn size.
    pub size: Size,
    body: Size,
    bounce: f32,
    collide_world_bounds: bool,
}

impl Actor {
    pub fn rect(&self) -> Rect {
        Rect { cx: self.x, cy: self.y, hw: self.size.w / 2.0, hh: self.size.h / 2.0 }
    }

    pub fn body(&self) -> Rect {
        Rect { cx: self.x, cy: self.y, hw: self.body.w / 2.0, hh: self.body.h / 2.0 }
    }
}

pub struct TextObject {
    pub value: String,
    pub style: TextStyle,
    /// World point the bottom centre of the text sits on.
    pub anchor: Option<(f32, f32)>,
}

#[derive(Clone, Copy)]
enum Response {
    Overlap(Contact),
    Collide,
}

struct Relation {
    actor: ActorId,
    others: Vec<ActorId>,
    response: Response,
}

pub struct ArcadeWorld {
    width: f32,
    height: f32,
    gravity: f32,
    assets: HashMap<String, Asset>,
    bodies: HashMap<String, Size>,
    actors: Vec<Actor>,
    groups: Vec<Vec<ActorId>>,
    relations: Vec<Relation>,
    texts: Vec<TextObject>,
    contacts: Vec<Contact>,
    frame: u64,
}

impl ArcadeWorld {
    pub fn new(width: f32, height: f32, gravity: f32) -> Self {
        Self {
            width,
            height,
            gravity,
            assets: HashMap::new(),
            bodies: HashMap::new(),
            actors: Vec::new(),
            groups: Vec::new(),
            relations: Vec::new(),
            texts: Vec::new(),
            contacts: Vec::new(),
            frame: 0,
        }
    }

    /// Physics box for sprites of `key`, centred in the frame and scaled
    /// with the sprite. Without it the whole frame collides.
    pub fn with_body(mut self, key: &str, body: Size) -> Self {
        self.bodies.insert(key.to_string(), body);
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    pub fn texts(&self) -> &[TextObject] {
        &self.texts
    }

    /// Advances dynamic bodies by `dt` seconds and runs overlaps and
    /// colliders in the order they were registered.
    pub fn step(&mut self, dt: f32) {
        self.frame += 1;

        let (width, height, gravity) = (self.width, self.height, self.gravity);
        for a in self.actors.iter_mut().filter(|a| a.kind == BodyKind::Dynamic) {
            a.vy += gravity * dt;
            a.x += a.vx * dt;
            a.y += a.vy * dt;
            if a.collide_world_bounds {
                clamp_to_bounds(a, width, height);
            }
        }

        for rel in &self.relations {
            for &other in &rel.others {
                let theirs = self.actors[other.0].body();
                let mine = &mut self.actors[rel.actor.0];
                if !mine.body().intersects(&theirs) {
                    continue;
                }
                match rel.response {
                    Response::Overlap(contact) => self.contacts.push(contact),
                    Response::Collide => separate(mine, &theirs),
                }
            }
        }
    }

    fn asset(&self, key: &str) -> Result<Asset, HostError> {
        self.assets
            .get(key)
            .copied()
            .ok_or_else(|| HostError::UnknownAsset(key.to_string()))
    }

    fn spawn(
        &mut self,
        key: &str,
        x: f32,
        y: f32,
        scale: f32,
        kind: BodyKind,
    ) -> Result<ActorId, HostError> {
        let asset = self.asset(key)?;
        let size = asset.size().scaled(scale);
        let body = match (asset, self.bodies.get(key)) {
            (Asset::Sheet(_), Some(body)) => body.scaled(scale),
            _ => size,
        };
        self.actors.push(Actor {
            key: key.to_string(),
            kind,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size,
            body,
            bounce: 0.0,
            collide_world_bounds: false,
        });
        Ok(ActorId(self.actors.len() - 1))
    }

    fn resolve(&self, target: Target) -> Result<Vec<ActorId>, HostError> {
        match target {
            Target::Actor(id) if id.0 < self.actors.len() => Ok(vec![id]),
            Target::Actor(id) => Err(HostError::UnknownActor(id)),
            Target::Group(id) => self
                .groups
                .get(id.0)
                .cloned()
                .ok_or(HostError::UnknownGroup(id)),
        }
    }

    fn relate(
        &mut self,
        actor: ActorId,
        other: Target,
        response: Response,
    ) -> Result<(), HostError> {
        if actor.0 >= self.actors.len() {
            return Err(HostError::UnknownActor(actor));
        }
        let others = self.resolve(other)?;
        self.relations.push(Relation { actor, others, response });
        Ok(())
    }
}

fn clamp_to_bounds(a: &mut Actor, width: f32, height: f32) {
    let hw = a.body.w / 2.0;
    let hh = a.body.h / 2.0;
    if a.x - hw < 0.0 {
        a.x = hw;
        a.vx = -a.vx * a.bounce;
    } else if a.x + hw > width {
        a.x = width - hw;
        a.vx = -a.vx * a.bounce;
    }
    if a.y - hh < 0.0 {
        a.y = hh;
        a.vy = -a.vy * a.bounce;
    } else if a.y + hh > height {
        a.y = height - hh;
        a.vy = -a.vy * a.bounce;
    }
}

/// Pushes `a` out of `wall` along the shallower axis, reflecting the
/// velocity into the wall scaled by `a`'s bounce.
fn separate(a: &mut Actor, wall: &Rect) {
    let (pen_x, pen_y) = a.body().penetration(wall);
    if pen_y < pen_x {
        if a.y < wall.cy {
            a.y -= pen_y;
            if a.vy > 0.0 {
                a.vy = -a.vy * a.bounce;
            }
        } else {
            a.y += pen_y;
            if a.vy < 0.0 {
                a.vy = -a.vy * a.bounce;
            }
        }
    } else if a.x < wall.cx {
        a.x -= pen_x;
        if a.vx > 0.0 {
            a.vx = -a.vx * a.bounce;
        }
    } else {
        a.x += pen_x;
        if a.vx < 0.0 {
            a.vx = -a.vx * a.bounce;
        }
    }
}

impl Host for ArcadeWorld {
    fn load_image(&mut self, key: &str, size: Size) -> Result<(), HostError> {
        self.assets.insert(key.to_string(), Asset::Image(size));
        Ok(())
    }

    fn load_spritesheet(&mut self, key: &str, frame: Size) -> Result<(), HostError> {
        self.assets.insert(key.to_string(), Asset::Sheet(frame));
        Ok(())
    }

    fn add_image(
        &mut self,
        key: &str,
        x: f32,
        y: f32,
        origin: Origin,
    ) -> Result<ActorId, HostError> {
        let size = self.asset(key)?.size();
        let cx = x + (0.5 - origin.x) * size.w;
        let cy = y + (0.5 - origin.y) * size.h;
        self.spawn(key, cx, cy, 1.0, BodyKind::None)
    }

    fn add_static(&mut self, key: &str, x: f32, y: f32, scale: f32) -> Result<ActorId, HostError> {
        self.spawn(key, x, y, scale, BodyKind::Static)
    }

    fn add_static_group(&mut self, key: &str, layout: GroupLayout) -> Result<GroupId, HostError> {
        let members = (0..layout.count)
            .map(|i| {
                let x = layout.x + i as f32 * layout.step_x;
                self.spawn(key, x, layout.y, 1.0, BodyKind::Static)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.groups.push(members);
        Ok(GroupId(self.groups.len() - 1))
    }

    fn add_sprite(&mut self, key: &str, spec: SpriteSpec) -> Result<ActorId, HostError> {
        let id = self.spawn(key, spec.x, spec.y, spec.scale, BodyKind::Dynamic)?;
        let a = &mut self.actors[id.0];
        a.bounce = spec.bounce;
        a.collide_world_bounds = spec.collide_world_bounds;
        Ok(id)
    }

    fn add_overlap(
        &mut self,
        actor: ActorId,
        other: Target,
        contact: Contact,
    ) -> Result<(), HostError> {
        self.relate(actor, other, Response::Overlap(contact))
    }

    fn add_collider(&mut self, actor: ActorId, other: Target) -> Result<(), HostError> {
        self.relate(actor, other, Response::Collide)
    }

    fn add_text(&mut self, text: &str, style: TextStyle) -> TextId {
        self.texts.push(TextObject { value: text.to_string(), style, anchor: None });
        TextId(self.texts.len() - 1)
    }

    fn align_bottom_center(
        &mut self,
        text: TextId,
        within: ActorId,
        offset_y: f32,
    ) -> Result<(), HostError> {
        let rect = self
            .actors
            .get(within.0)
            .map(Actor::rect)
            .ok_or(HostError::UnknownActor(within))?;
        let t = self.texts.get_mut(text.0).ok_or(HostError::UnknownText(text))?;
        t.anchor = Some((rect.cx, rect.bottom() - offset_y));
        Ok(())
    }

    fn set_text(&mut self, text: TextId, value: &str) {
        if let Some(t) = self.texts.get_mut(text.0) {
            if t.value != value {
                t.value = value.to_string();
            }
        }
    }

    fn set_velocity_x(&mut self, actor: ActorId, vx: f32) {
        if let Some(a) = self.actors.get_mut(actor.0) {
            a.vx = vx;
        }
    }

    fn set_velocity_y(&mut self, actor: ActorId, vy: f32) {
        if let Some(a) = self.actors.get_mut(actor.0) {
            a.vy = vy;
        }
    }

    fn position(&self, actor: ActorId) -> (f32, f32) {
        self.actors.get(actor.0).map_or((0.0, 0.0), |a| (a.x, a.y))
    }

    fn drain_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }
}
