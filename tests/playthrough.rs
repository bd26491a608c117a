use column_dash::arcade::ArcadeWorld;
use column_dash::host::{Host, Keys};
use column_dash::level::{self, MSG_CRASHED, MSG_IN_FLIGHT, MSG_INSTRUCTIONS, MSG_WON};
use column_dash::session::{Message, Outcome, Session};

const DT: f32 = 1.0 / 30.0;
const IDLE: Keys = Keys { start: false, ascend: false };
const START: Keys = Keys { start: true, ascend: false };

fn new_game() -> (ArcadeWorld, Session) {
    let mut world = ArcadeWorld::new(level::WORLD_W, level::WORLD_H, level::GRAVITY)
        .with_body(level::BIRD, level::BIRD_BODY);
    let session = Session::setup(&mut world).expect("level should build");
    (world, session)
}

fn frame(world: &mut ArcadeWorld, session: &mut Session, keys: Keys) {
    world.step(DT);
    session.update(world, keys);
}

fn message(world: &ArcadeWorld) -> &str {
    &world.texts()[0].value
}

#[test]
fn level_layout() {
    let (world, _) = new_game();
    let keys: Vec<_> = world.actors().iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, ["background", "road", "column", "column", "column", "column", "bird"]);

    let columns: Vec<_> = world
        .actors()
        .iter()
        .filter(|a| a.key == "column")
        .map(|a| (a.x, a.y))
        .collect();
    assert_eq!(columns, [(200.0, 0.0), (500.0, 0.0), (350.0, 400.0), (650.0, 400.0)]);
    assert_eq!(message(&world), MSG_INSTRUCTIONS);
    assert_eq!(world.texts()[0].anchor, Some((400.0, 550.0)));
}

#[test]
fn bird_floats_to_the_ceiling_before_start() {
    let (mut world, mut session) = new_game();
    for _ in 0..30 {
        frame(&mut world, &mut session, IDLE);
    }
    let bird = world.actor(session.bird()).unwrap();
    assert_eq!(bird.y, 16.0);
    assert_eq!(bird.x, 24.0);
    assert_eq!(bird.vy, level::ASCEND_VY);
    assert!(!session.started());
    assert_eq!(message(&world), MSG_INSTRUCTIONS);
}

#[test]
fn falling_bird_lands_then_slides_into_a_column() {
    let (mut world, mut session) = new_game();
    let bird = session.bird();

    frame(&mut world, &mut session, START);
    assert!(session.started());
    assert_eq!(message(&world), MSG_IN_FLIGHT);

    // No ascend input: gravity brings the bird down onto the road well
    // before it reaches the first column.
    for _ in 0..120 {
        frame(&mut world, &mut session, IDLE);
    }
    assert!(session.landed());
    assert!(!session.bumped());
    assert_eq!(session.outcome(), Outcome::Crashed);
    assert_eq!(message(&world), MSG_CRASHED);

    // One flag alone does not stop the bird.
    assert_eq!(world.actor(bird).unwrap().vx, level::FORWARD_VX);
    let x_before = world.position(bird).0;

    // Ascend is ignored now.
    frame(&mut world, &mut session, Keys { start: false, ascend: true });
    assert!(world.position(bird).1 > 500.0);
    assert!(world.position(bird).0 > x_before);

    let mut frames = 0;
    while !session.bumped() {
        frame(&mut world, &mut session, IDLE);
        frames += 1;
        assert!(frames < 300, "bird never reached the bottom column");
    }
    // The bump from this frame's physics already stopped the bird.
    assert!(session.landed());
    assert_eq!(world.actor(bird).unwrap().vx, 0.0);
    assert_eq!(message(&world), MSG_CRASHED);

    let stopped_at = world.position(bird).0;
    for _ in 0..30 {
        frame(&mut world, &mut session, START);
    }
    assert_eq!(world.actor(bird).unwrap().vx, 0.0);
    assert!((world.position(bird).0 - stopped_at).abs() < 1.0);
    assert!(world.position(bird).0 + 24.0 <= 326.0 + 1e-3);
    assert_eq!(session.message(), Message::Crashed);
}

/// Heights to hold the bird at, by x: under the first top column, over the
/// first bottom column, under the second top column, then over the second
/// bottom column to the finish.
const ROUTE: [(f32, f32); 4] = [(250.0, 280.0), (390.0, 80.0), (550.0, 280.0), (f32::MAX, 80.0)];

fn steer(world: &ArcadeWorld, session: &Session) -> Keys {
    let (x, y) = world.position(session.bird());
    let target = ROUTE.iter().find(|(until, _)| x < *until).map_or(80.0, |&(_, y)| y);
    Keys { start: false, ascend: y > target }
}

#[test]
fn steering_through_the_gaps_wins() {
    let (mut world, mut session) = new_game();
    let bird = session.bird();
    frame(&mut world, &mut session, START);

    let mut frames = 0;
    while session.outcome() == Outcome::Playing {
        let keys = steer(&world, &session);
        frame(&mut world, &mut session, keys);
        frames += 1;
        assert!(frames < 1000, "bird never reached the finish line");
    }

    assert_eq!(session.outcome(), Outcome::Won);
    assert!(!session.landed());
    assert!(!session.bumped());
    assert!(world.position(bird).0 > level::FINISH_X);
    assert_eq!(world.actor(bird).unwrap().vy, level::WIN_DESCEND_VY);
    assert_eq!(message(&world), MSG_WON);
}
