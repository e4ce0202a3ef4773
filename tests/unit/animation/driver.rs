use super::*;
use crate::geometry::angle::PI;
use crate::scene::document::SvgDocument;

fn cfg(max_cusps: u32, duration: f64) -> DriverConfig {
    DriverConfig {
        max_cusps,
        duration,
        final_angle: Some(2.0),
        ..DriverConfig::default()
    }
}

#[test]
fn configured_final_angle_is_kept() {
    let d = Driver::new(cfg(3, 1000.0)).unwrap();
    assert_eq!(d.final_angle(), 2.0);
}

#[test]
fn random_final_angle_is_seeded_and_in_range() {
    let c = DriverConfig {
        seed: Some(99),
        ..DriverConfig::default()
    };
    let a = Driver::new(c.clone()).unwrap().final_angle();
    let b = Driver::new(c).unwrap().final_angle();
    assert_eq!(a, b);
    assert!((0.7 * TAU..1.7 * TAU).contains(&a));

    let d = Driver::new(DriverConfig::default()).unwrap();
    let first = d.final_angle();
    assert_eq!(d.final_angle(), first);
}

#[test]
fn invalid_config_is_rejected() {
    assert!(Driver::new(cfg(0, 1000.0)).is_err());
}

#[test]
fn spin_target_wraps_to_zero_for_whole_turns() {
    let d = Driver::new(DriverConfig {
        max_cusps: 5,
        final_angle: Some(PI),
        ..DriverConfig::default()
    })
    .unwrap();
    assert!(d.spin_target().abs() < 1e-12);
}

#[test]
fn run_pause_transitions() {
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    assert_eq!(d.state(), RunState::Paused);
    assert!(d.pause().unwrap_err().is_transition());
    assert_eq!(d.state(), RunState::Paused);

    d.run().unwrap();
    assert_eq!(d.state(), RunState::Running);
    assert!(d.wants_frame());
    assert!(d.run().unwrap_err().is_transition());
    assert_eq!(d.state(), RunState::Running);

    d.pause().unwrap();
    assert_eq!(d.state(), RunState::Paused);
    assert!(!d.wants_frame());
}

#[test]
fn first_frame_initializes_with_zero_delta() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(4, 1000.0)).unwrap();
    d.step_by(300.0).unwrap();
    let out = d.frame(&mut doc, 5000.0).unwrap();
    assert_eq!(out, FrameOutcome::Advanced { p: 0.0 });
    assert!(d.is_initialized());
    assert_eq!(d.elapsed(), 0.0);

    let ranks: Vec<u32> = d.curve_sets().iter().map(|s| s.cusps()).collect();
    assert_eq!(ranks, vec![4, 3, 2, 1]);
}

#[test]
fn manual_steps_advance_by_fixed_deltas() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    d.initialize(&mut doc).unwrap();

    d.step().unwrap();
    assert_eq!(d.pending(), Some(TickRequest::Fixed(50.0)));
    // The wall clock is irrelevant in manual mode.
    assert_eq!(
        d.frame(&mut doc, 123_456.0).unwrap(),
        FrameOutcome::Advanced { p: 0.05 }
    );
    assert!(!d.wants_frame());
    assert_eq!(d.frame(&mut doc, 123_500.0).unwrap(), FrameOutcome::Idle);

    d.step_by(200.0).unwrap();
    d.frame(&mut doc, 0.0).unwrap();
    assert_eq!(d.elapsed(), 250.0);
    assert_eq!(d.state(), RunState::Paused);
}

#[test]
fn negative_step_is_rejected() {
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    assert!(matches!(d.step_by(-1.0), Err(EpiError::Validation(_))));
    assert!(!d.wants_frame());
}

#[test]
fn running_frames_track_wall_time() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    d.run().unwrap();
    d.frame(&mut doc, 100.0).unwrap();
    d.frame(&mut doc, 116.0).unwrap();
    d.frame(&mut doc, 150.0).unwrap();
    assert_eq!(d.elapsed(), 50.0);
    assert!(d.wants_frame());
}

#[test]
fn step_while_running_switches_to_paused() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    d.run().unwrap();
    d.frame(&mut doc, 0.0).unwrap();
    d.step().unwrap();
    assert_eq!(d.state(), RunState::Paused);
    assert_eq!(d.frame(&mut doc, 16.0).unwrap(), FrameOutcome::Idle);
    assert_eq!(d.elapsed(), 0.0);
}

#[test]
fn pause_keeps_elapsed_and_resume_reanchors() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    d.run().unwrap();
    d.frame(&mut doc, 0.0).unwrap();
    d.frame(&mut doc, 100.0).unwrap();
    d.pause().unwrap();
    assert_eq!(d.frame(&mut doc, 116.0).unwrap(), FrameOutcome::Idle);
    assert_eq!(d.elapsed(), 100.0);

    d.run().unwrap();
    d.frame(&mut doc, 5000.0).unwrap();
    assert_eq!(d.elapsed(), 100.0);
    d.frame(&mut doc, 5020.0).unwrap();
    assert_eq!(d.elapsed(), 120.0);
}

#[test]
fn reaching_duration_is_terminal() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(2, 100.0)).unwrap();
    d.run().unwrap();
    d.frame(&mut doc, 0.0).unwrap();
    assert_eq!(d.frame(&mut doc, 250.0).unwrap(), FrameOutcome::Finished);
    assert_eq!(d.state(), RunState::Done);
    assert_eq!(d.elapsed(), 100.0);
    assert_eq!(d.progress(), 1.0);
    assert!(!d.wants_frame());

    assert!(d.run().unwrap_err().is_transition());
    assert!(d.pause().unwrap_err().is_transition());
    assert!(d.step().unwrap_err().is_transition());
    assert!(d.seek(&mut doc, 0.0).unwrap_err().is_transition());
    assert_eq!(d.state(), RunState::Done);
}

#[test]
fn master_frame_spins_about_the_largest_hub() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(3, 1000.0)).unwrap();
    d.seek(&mut doc, 500.0).unwrap();
    let s = d.drawing().unwrap().state();
    assert!((s.rot - d.spin_target() * 0.5).abs() < 1e-12);
    assert_eq!(s.cx, -3.0);
    assert_eq!(s.cy, 0.0);
}

#[test]
fn seek_clamps_and_keeps_state() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    assert_eq!(d.seek(&mut doc, 5000.0).unwrap(), 1.0);
    assert_eq!(d.state(), RunState::Paused);
    assert_eq!(d.seek(&mut doc, -5.0).unwrap(), 0.0);
    assert!(d.seek(&mut doc, f64::NAN).is_err());

    d.run().unwrap();
    assert!(d.seek(&mut doc, 10.0).unwrap_err().is_transition());
}

#[test]
fn title_fades_in_with_progress() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(DriverConfig {
        title: Some("Happy Valentine's Day".to_owned()),
        ..cfg(2, 1000.0)
    })
    .unwrap();
    d.seek(&mut doc, 250.0).unwrap();
    let root = d.root().unwrap();
    let texts = doc.descendants_of_kind(root, NodeKind::Text);
    assert_eq!(texts.len(), 1);
    assert_eq!(doc.attr(texts[0], "opacity"), Some("0.25"));
}

#[test]
fn initialize_runs_once() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(3, 1000.0)).unwrap();
    d.initialize(&mut doc).unwrap();
    let n = doc.len();
    d.initialize(&mut doc).unwrap();
    assert_eq!(doc.len(), n);
    assert_eq!(d.curve_sets().len(), 3);
}

#[test]
fn steps_before_a_frame_accumulate() {
    let mut doc = SvgDocument::new();
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    d.initialize(&mut doc).unwrap();

    d.step().unwrap();
    d.step().unwrap();
    assert_eq!(d.pending(), Some(TickRequest::Fixed(100.0)));
    assert_eq!(
        d.frame(&mut doc, 0.0).unwrap(),
        FrameOutcome::Advanced { p: 0.1 }
    );
    assert_eq!(d.elapsed(), 100.0);
    assert_eq!(d.frame(&mut doc, 16.0).unwrap(), FrameOutcome::Idle);
    assert_eq!(d.elapsed(), 100.0);
}

#[test]
fn run_replaces_a_pending_step() {
    let mut d = Driver::new(cfg(2, 1000.0)).unwrap();
    d.step().unwrap();
    d.run().unwrap();
    assert_eq!(d.pending(), Some(TickRequest::SinceLastFrame));
    d.step().unwrap();
    assert_eq!(d.state(), RunState::Paused);
    d.step_by(30.0).unwrap();
    assert_eq!(d.pending(), Some(TickRequest::Fixed(30.0)));
}
