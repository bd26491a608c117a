use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};
use std::fs::File;
use std::io::{self, Stdout, stdout};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use column_dash::arcade::ArcadeWorld;
use column_dash::config::{CONFIG_FILE, Config};
use column_dash::input::KeyState;
use column_dash::level;
use column_dash::render::{self, PixelBuf};
use column_dash::session::{Outcome, Session};
use column_dash::sound::{Cue, Sound};
use column_dash::term;

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn enter(out: &mut Stdout, releases: bool) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;
    if releases {
        execute!(
            out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Ok(())
}

fn run(
    out: &mut Stdout,
    world: &mut ArcadeWorld,
    session: &mut Session,
    sound: Option<&Sound>,
    cfg: &Config,
    releases: bool,
) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut keys = KeyState::new(Duration::from_millis(cfg.key_hold_ms), releases);

    let frame_dur = Duration::from_secs(1) / cfg.fps;
    let dt = frame_dur.as_secs_f32();
    let mut crash_cued = false;
    let mut win_cued = false;

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if keys.handle(key, frame_start) {
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => buf.resize(c as usize, r as usize * 2),
                _ => {}
            }
        }

        // Physics first, so this frame's contacts reach the session
        world.step(dt);
        session.update(world, keys.poll(frame_start));

        let cue = match session.outcome() {
            Outcome::Crashed if !crash_cued => {
                crash_cued = true;
                Some(Cue::Crash)
            }
            Outcome::Won if !win_cued => {
                info!(frame = world.frame(), "finish line crossed");
                win_cued = true;
                Some(Cue::Win)
            }
            _ => None,
        };
        if let (Some(cue), Some(sound)) = (cue, sound) {
            sound.play(cue);
        }

        render::present(world, &mut buf, out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn main() -> io::Result<()> {
    let (cfg, problem) = Config::load(Path::new(CONFIG_FILE));
    if let Some(path) = &cfg.log_file {
        init_logging(path)?;
    }
    Config::report(problem);

    let mut world = ArcadeWorld::new(level::WORLD_W, level::WORLD_H, level::GRAVITY)
        .with_body(level::BIRD, level::BIRD_BODY);
    let mut session = Session::setup(&mut world).map_err(io::Error::other)?;
    let sound = if cfg.sound { Sound::open() } else { None };

    let mut out = stdout();
    let releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
    let result = enter(&mut out, releases).and_then(|()| {
        info!(fps = cfg.fps, releases, "terminal ready");
        run(&mut out, &mut world, &mut session, sound.as_ref(), &cfg, releases)
    });

    let restored = term::restore(&mut out, releases, terminal::disable_raw_mode);
    result.and(restored)
}
