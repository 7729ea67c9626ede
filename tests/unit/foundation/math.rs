use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"supershow");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_u8(b's');
    b.write_bytes(b"upershow");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn length_prefixed_strings_do_not_alias() {
    let mut a = Fnv1a64::new_default();
    a.write_str("ab");
    a.write_str("c");
    let mut b = Fnv1a64::new_default();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn gaussian_is_finite_and_centered() {
    let mut rng = fastrand::Rng::with_seed(7);
    let n = 20_000;
    let mut sum = 0.0;
    for _ in 0..n {
        let g = gaussian(&mut rng);
        assert!(g.is_finite());
        sum += g;
    }
    assert!((sum / n as f64).abs() < 0.05);
}

#[test]
fn uniform_handles_empty_range() {
    let mut rng = fastrand::Rng::with_seed(1);
    assert_eq!(uniform(&mut rng, 5.0, 5.0), 5.0);
    for _ in 0..1000 {
        let v = uniform(&mut rng, -1.0, 1.0);
        assert!((-1.0..=1.0).contains(&v));
    }
}

#[test]
fn round_to_two_decimals() {
    assert_eq!(round_to(1.23456, 2), 1.23);
    assert_eq!(round_to(-0.005, 2), -0.01);
}
