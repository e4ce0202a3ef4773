use super::*;

fn count_points(path: &str) -> usize {
    assert!(path.starts_with("M "));
    1 + path.matches(" L ").count()
}

#[test]
fn zero_cusps_is_rejected() {
    assert!(matches!(EpiCycloid::new(0), Err(EpiError::Validation(_))));
}

#[test]
fn table_size_tracks_cusps() {
    for n in [1u32, 2, 7, 20] {
        let e = EpiCycloid::new(n).unwrap();
        assert_eq!(e.total_points(), n as usize * POINT_DENSITY);
        assert_eq!(e.cusps(), n);
    }
}

#[test]
fn path_at_zero_is_move_to_only() {
    for n in 1..=6 {
        let e = EpiCycloid::new(n).unwrap();
        let p = e.path_to(0.0);
        assert_eq!(count_points(p), 1);
        assert!(!p.contains('L'));
    }
}

#[test]
fn path_at_full_turn_has_every_point() {
    for n in 1..=6 {
        let e = EpiCycloid::new(n).unwrap();
        assert_eq!(count_points(e.path_to(TAU)), e.total_points());
    }
}

#[test]
fn path_past_full_turn_clamps() {
    let e = EpiCycloid::new(3).unwrap();
    let full = e.path_to(TAU);
    assert_eq!(e.path_to(TAU + 0.1), full);
    assert_eq!(e.path_to(100.0), full);
}

#[test]
fn negative_and_nan_angles_clamp_to_first_point() {
    let e = EpiCycloid::new(2).unwrap();
    assert_eq!(e.path_to(-1.0), e.path_to(0.0));
    assert_eq!(e.path_to(f64::NAN), e.path_to(0.0));
}

#[test]
fn paths_grow_monotonically_as_prefixes() {
    let e = EpiCycloid::new(4).unwrap();
    let mut prev = e.path_to(0.0);
    for i in 1..=40 {
        let next = e.path_to(TAU * f64::from(i) / 40.0);
        assert!(next.starts_with(prev));
        prev = next;
    }
}

#[test]
fn half_turn_reveals_half_the_table() {
    let e = EpiCycloid::new(1).unwrap();
    // 50 * 0.5 + 1 = 26
    assert_eq!(e.points_revealed(PI), 26);
}

#[test]
fn coordinates_have_exactly_three_decimals() {
    let e = EpiCycloid::new(5).unwrap();
    for tok in e.path_to(TAU).split(' ') {
        if tok == "M" || tok == "L" {
            continue;
        }
        let (_, frac) = tok.split_once('.').unwrap();
        assert_eq!(frac.len(), 3, "token {tok}");
    }
}

#[test]
fn first_and_last_points_close_the_curve() {
    // At angle 0 and TAU the pen sits at (n, 0): roll radius n+1 minus the pen offset of 1.
    let n = 3;
    let e = EpiCycloid::new(n).unwrap();
    let first = e.points()[0];
    let last = e.points()[e.total_points() - 1];
    assert!((first.x - f64::from(n)).abs() < 1e-12);
    assert!(first.y.abs() < 1e-12);
    assert!((last.x - first.x).abs() < 1e-9);
    assert!((last.y - first.y).abs() < 1e-9);
    assert!(e.path_to(0.0).starts_with("M 3.000 "));
}

#[test]
fn cusps_touch_the_hub() {
    // Cusps occur where the pen touches the hub circle of radius n.
    let n = 4u32;
    let e = EpiCycloid::new(n).unwrap();
    for k in 0..n {
        let a = TAU * f64::from(k) / f64::from(n);
        let p = e.point(a);
        assert!(((p.x * p.x + p.y * p.y).sqrt() - f64::from(n)).abs() < 1e-9);
    }
}
