//! Whole-match scenarios driven through the public engine API

use glam::Vec2;

use oval_footy::audio::{AudioSink, OUT_ON_THE_FULL, SoundEffect};
use oval_footy::consts::FRAME_DT;
use oval_footy::renderer::VertexBatch;
use oval_footy::sim::{End, MatchEvent, Side};
use oval_footy::teams::TEAMS;
use oval_footy::{Lifecycle, MatchEngine, Scoreboard};

#[derive(Default)]
struct RecordingAudio {
    effects: Vec<SoundEffect>,
    phrases: Vec<String>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.effects.push(effect);
    }

    fn announce(&mut self, phrase: &str) {
        self.phrases.push(phrase.to_string());
    }
}

fn kick_off(seed: u64) -> MatchEngine<Scoreboard, RecordingAudio> {
    let mut engine = MatchEngine::new(
        &TEAMS[0],
        &TEAMS[2],
        Scoreboard::new(),
        RecordingAudio::default(),
        seed,
    );
    engine.start();
    engine
}

fn press(engine: &mut MatchEngine<Scoreboard, RecordingAudio>, code: &str) {
    assert!(engine.key_down(code));
    assert!(engine.key_up(code));
}

/// Put the ball a few pixels inside `end`'s scoring line at height `y`,
/// travelling out through it
fn roll_toward_line(engine: &mut MatchEngine<Scoreboard, RecordingAudio>, end: End, y: f32) {
    let area = engine.field().goal_area(end);
    let state = engine.state_mut();
    state.ball.pos = Vec2::new(area.line_x - end.outward() * 5.0, y);
    state.ball.vel = Vec2::new(end.outward() * 600.0, 0.0);
    state.ball_was_inside = true;
}

#[test]
fn test_kick_launches_ball_and_hands_over_control() {
    let mut engine = kick_off(3);
    let kicker = engine.state().controlled_index();
    let at = engine.state().controlled().pos;
    engine.state_mut().ball.pos = at;

    engine.key_down("KeyD");
    press(&mut engine, "KeyJ");
    let events = engine.update(FRAME_DT);

    let Some(MatchEvent::Kicked { by, angle, power }) = events
        .iter()
        .copied()
        .find(|e| matches!(e, MatchEvent::Kicked { .. }))
    else {
        panic!("expected a kick, got {events:?}");
    };
    let tuning = engine.tuning();
    assert_eq!(by, kicker);
    assert!(angle.abs() <= tuning.kick_jitter + 1e-4);
    assert!((tuning.kick_power_min..=tuning.kick_power_max).contains(&power));

    let ball = &engine.state().ball;
    assert!(ball.vel.x > 0.0);
    assert!(ball.z > 0.0 && ball.vz > 0.0);
    assert!(ball.was_kicked);
    assert_eq!(engine.audio().effects, vec![SoundEffect::Kick]);

    // Control moved to a teammate and exactly one player holds it
    let controlled: Vec<_> = engine
        .state()
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_controlled)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(controlled, vec![engine.state().controlled_index()]);
    assert_ne!(controlled[0], kicker);
    assert_eq!(engine.state().controlled().side, Side::Home);
}

#[test]
fn test_goal_updates_scoreboard() {
    let mut engine = kick_off(5);
    let y = engine.field().center.y;
    roll_toward_line(&mut engine, End::Right, y);

    let events = engine.update(FRAME_DT);
    assert_eq!(events, vec![MatchEvent::Goal { side: Side::Home, end: End::Right }]);

    let scores = engine.scores();
    assert_eq!(scores.home.goals, 1);
    assert_eq!(scores.home.total(), 6);
    assert_eq!(scores.away.total(), 0);
    assert_eq!(scores.leader(), Some(Side::Home));
    assert_eq!(engine.state().ball.pos, engine.field().centre());
    assert_eq!(engine.audio().effects, vec![SoundEffect::Goal]);
}

#[test]
fn test_behind_updates_scoreboard() {
    let mut engine = kick_off(5);
    let area = engine.field().goal_area(End::Left);
    roll_toward_line(&mut engine, End::Left, area.behind_top + 2.0);

    let events = engine.update(FRAME_DT);
    assert_eq!(events, vec![MatchEvent::Behind { side: Side::Away, end: End::Left }]);

    let scores = engine.scores();
    assert_eq!(scores.away.behinds, 1);
    assert_eq!(scores.away.to_string(), "0.1 (1)");
    assert_eq!(scores.home.total(), 0);
    assert_eq!(engine.audio().effects, vec![SoundEffect::Behind]);

    let ball = &engine.state().ball;
    assert!(engine.field().is_inside(ball.pos, ball.radius));
}

#[test]
fn test_out_on_the_full_calls_umpire() {
    let mut engine = kick_off(9);
    let x = engine.field().center.x;
    {
        let ball = &mut engine.state_mut().ball;
        ball.pos = Vec2::new(x, 40.0);
        ball.vel = Vec2::new(0.0, -1200.0);
        ball.z = 50.0;
        ball.was_kicked = true;
    }
    engine.state_mut().ball_was_inside = true;

    let events = engine.update(FRAME_DT);
    assert!(matches!(events[..], [MatchEvent::OutOfBounds { on_the_full: true, .. }]));
    assert_eq!(engine.audio().phrases, vec![OUT_ON_THE_FULL.to_string()]);
    assert_eq!(engine.scores().home.total() + engine.scores().away.total(), 0);
}

/// Chase the ball and boot it whenever it is in reach
fn scripted_match(seed: u64, frames: usize) -> MatchEngine<Scoreboard, RecordingAudio> {
    let mut engine = kick_off(seed);
    let keys = ["KeyD", "KeyS", "KeyA", "KeyW"];
    for frame in 0..frames {
        let key = keys[(frame / 45) % keys.len()];
        if frame % 45 == 0 {
            for other in keys {
                engine.key_up(other);
            }
            engine.key_down(key);
        }
        if frame % 10 == 0 {
            press(&mut engine, "KeyJ");
        }
        if frame % 17 == 0 {
            press(&mut engine, "KeyK");
        }
        if frame % 23 == 0 {
            press(&mut engine, "KeyL");
        }

        let events = engine.update(FRAME_DT);
        let scored = events.iter().any(MatchEvent::is_score);
        let out = events
            .iter()
            .any(|e| matches!(e, MatchEvent::OutOfBounds { .. }));
        assert!(!(scored && out), "frame {frame}: {events:?}");

        let ball = &engine.state().ball;
        assert!(ball.z >= 0.0);
        assert!(ball.pos.is_finite() && ball.vel.is_finite());
    }
    engine
}

#[test]
fn test_scripted_match_holds_invariants() {
    let engine = scripted_match(21, 1200);
    assert_eq!(engine.state().time_ticks, 1200);

    let field = engine.field();
    for player in &engine.state().players {
        assert!(field.is_inside(player.pos, 0.0));
    }
}

#[test]
fn test_same_seed_same_match() {
    let a = scripted_match(77, 600);
    let b = scripted_match(77, 600);

    assert_eq!(a.state().ball.pos, b.state().ball.pos);
    assert_eq!(a.state().controlled_index(), b.state().controlled_index());
    for (pa, pb) in a.state().players.iter().zip(&b.state().players) {
        assert_eq!(pa.pos, pb.pos);
    }
    assert_eq!(a.scores().home, b.scores().home);
    assert_eq!(a.scores().away, b.scores().away);
    assert_eq!(a.audio().effects, b.audio().effects);
}

#[test]
fn test_render_is_read_only_and_destroy_stops_everything() {
    let mut engine = scripted_match(4, 120);
    let before = engine.state().ball.pos;

    let mut batch = VertexBatch::new();
    engine.render(&mut batch);
    assert!(!batch.is_empty());
    assert_eq!(engine.state().ball.pos, before);

    engine.destroy();
    assert_eq!(engine.lifecycle(), Lifecycle::Destroyed);
    assert!(!engine.key_down("KeyJ"));
    assert!(engine.update(FRAME_DT).is_empty());

    batch.clear();
    engine.render(&mut batch);
    assert!(batch.is_empty());
}
