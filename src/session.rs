use tracing::{debug, info};

use crate::host::{
    ActorId, BLACK, Contact, GroupLayout, Host, HostError, Keys, Origin, SpriteSpec, TextId,
    TextStyle, WHITE,
};
use crate::level::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    Instructions,
    InFlight,
    Crashed,
    Won,
}

impl Message {
    pub fn text(self) -> &'static str {
        match self {
            Message::Instructions => MSG_INSTRUCTIONS,
            Message::InFlight => MSG_IN_FLIGHT,
            Message::Crashed => MSG_CRASHED,
            Message::Won => MSG_WON,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    Crashed,
    Won,
}

/// State of the single run through the level.
///
/// `landed` and `bumped` only ever go from false to true; there is no
/// restart.
pub struct Session {
    bird: ActorId,
    text: TextId,
    started: bool,
    landed: bool,
    bumped: bool,
    message: Message,
}

impl Session {
    /// Loads assets and builds the level on `host`. Stops at the first host
    /// error.
    pub fn setup<H: Host>(host: &mut H) -> Result<Self, HostError> {
        host.load_image(BACKGROUND, BACKGROUND_SIZE)?;
        host.load_image(ROAD, ROAD_SIZE)?;
        host.load_image(COLUMN, COLUMN_SIZE)?;
        host.load_spritesheet(BIRD, BIRD_FRAME)?;

        let background = host.add_image(BACKGROUND, 0.0, 0.0, Origin::TOP_LEFT)?;
        let road = host.add_static(ROAD, ROAD_X, ROAD_Y, ROAD_SCALE)?;
        let top_columns = host.add_static_group(
            COLUMN,
            GroupLayout {
                count: COLUMNS_PER_GROUP,
                x: TOP_COLUMNS_X,
                y: TOP_COLUMNS_Y,
                step_x: COLUMN_STEP_X,
            },
        )?;
        let bottom_columns = host.add_static_group(
            COLUMN,
            GroupLayout {
                count: COLUMNS_PER_GROUP,
                x: BOTTOM_COLUMNS_X,
                y: BOTTOM_COLUMNS_Y,
                step_x: COLUMN_STEP_X,
            },
        )?;

        let bird = host.add_sprite(
            BIRD,
            SpriteSpec {
                x: BIRD_START_X,
                y: BIRD_START_Y,
                scale: BIRD_SCALE,
                bounce: BIRD_BOUNCE,
                collide_world_bounds: true,
            },
        )?;

        host.add_overlap(bird, road.into(), Contact::Ground)?;
        host.add_collider(bird, road.into())?;
        host.add_overlap(bird, top_columns.into(), Contact::Column)?;
        host.add_overlap(bird, bottom_columns.into(), Contact::Column)?;
        host.add_collider(bird, top_columns.into())?;
        host.add_collider(bird, bottom_columns.into())?;

        let text = host.add_text(
            Message::Instructions.text(),
            TextStyle {
                font_family: MESSAGE_FONT,
                font_size: MESSAGE_FONT_SIZE,
                color: BLACK,
                background: WHITE,
            },
        );
        host.align_bottom_center(text, background, MESSAGE_OFFSET_Y)?;

        info!("level ready");
        Ok(Session {
            bird,
            text,
            started: false,
            landed: false,
            bumped: false,
            message: Message::Instructions,
        })
    }

    /// One frame of game logic. Runs after the host's physics step for the
    /// same tick, so contacts from that step are already queued.
    pub fn update<H: Host>(&mut self, host: &mut H, keys: Keys) {
        for contact in host.drain_contacts() {
            match contact {
                Contact::Ground if !self.landed => {
                    info!("bird landed");
                    self.landed = true;
                }
                Contact::Column if !self.bumped => {
                    info!("bird bumped a column");
                    self.bumped = true;
                }
                _ => {}
            }
        }

        if keys.start && !self.started {
            info!("session started");
            self.started = true;
            self.show(host, Message::InFlight);
        }

        // Idle upward until the player starts.
        if !self.started {
            host.set_velocity_y(self.bird, ASCEND_VY);
        }

        if keys.ascend && !self.landed && !self.bumped {
            host.set_velocity_y(self.bird, ASCEND_VY);
        }

        // Forward motion stops only once both flags are set.
        if self.started && (!self.landed || !self.bumped) {
            host.set_velocity_x(self.bird, FORWARD_VX);
        } else {
            host.set_velocity_x(self.bird, 0.0);
        }

        if self.landed || self.bumped {
            self.show(host, Message::Crashed);
        }

        let (x, _) = host.position(self.bird);
        if x > FINISH_X {
            host.set_velocity_y(self.bird, WIN_DESCEND_VY);
            self.show(host, Message::Won);
        }
    }

    fn show<H: Host>(&mut self, host: &mut H, message: Message) {
        if self.message != message {
            debug!(?message, "message changed");
        }
        self.message = message;
        host.set_text(self.text, message.text());
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn landed(&self) -> bool {
        self.landed
    }

    pub fn bumped(&self) -> bool {
        self.bumped
    }

    pub fn message(&self) -> Message {
        self.message
    }

    pub fn outcome(&self) -> Outcome {
        match self.message {
            Message::Won => Outcome::Won,
            Message::Crashed => Outcome::Crashed,
            _ => Outcome::Playing,
        }
    }

    pub fn bird(&self) -> ActorId {
        self.bird
    }
}
