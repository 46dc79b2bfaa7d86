use std::sync::Arc;

use glam::Vec2;
use melee_trail::atlas::SpriteSheet;
use melee_trail::{
    Color, Direction, Keyframe, MeleeWeaponTrail, PixelBuffer, ResponseCurve, Sprite, Texture,
    TrailConfig, TrailError,
};

fn sprite_of(px: PixelBuffer) -> Sprite {
    Sprite::from_texture(Arc::new(Texture::new("weapon", px)))
}

fn config(direction: Direction, length: f32, bend: f32) -> TrailConfig {
    TrailConfig {
        direction,
        length,
        bend,
        curve: ResponseCurve::constant(1.0),
        ..TrailConfig::default()
    }
}

// ── End-to-end ────────────────────────────────────────────────────────────

#[test]
fn vertical_strip_trails_to_the_right() {
    let mut px = PixelBuffer::new(10, 10);
    for y in 0..10 {
        px.set(5, y, Color::RED);
    }

    let trail = MeleeWeaponTrail::new(config(Direction::Right, 5.0, 0.0));
    let out = trail.build(Some(&sprite_of(px))).unwrap().unwrap();

    for y in 0..10 {
        for x in 0..5 {
            assert_eq!(out.pixels.get(x, y), Some(Color::CLEAR), "({x},{y})");
        }
        assert_eq!(out.pixels.get(5, y), Some(Color::WHITE));
        for (x, expected) in [(6, 0.8), (7, 0.6), (8, 0.4), (9, 0.2)] {
            let c = out.pixels.get(x, y).unwrap();
            assert!((c.alpha() - expected).abs() < 1e-5, "({x},{y}) alpha {}", c.alpha());
            assert_eq!(c.with_alpha(1.0), Color::WHITE);
        }
    }
}

#[test]
fn transparent_sprite_gives_empty_trail() {
    let trail = MeleeWeaponTrail::new(config(Direction::Up, 50.0, 0.5));
    let out = trail.build(Some(&sprite_of(PixelBuffer::new(8, 8)))).unwrap().unwrap();
    assert_eq!(out.pixels, PixelBuffer::new(8, 8));
}

// ── No-ops and errors ─────────────────────────────────────────────────────

#[test]
fn disabled_trail_builds_nothing() {
    let cfg = TrailConfig { disabled: true, ..TrailConfig::default() };
    let sprite = sprite_of(PixelBuffer::filled(4, 4, Color::WHITE));
    assert!(MeleeWeaponTrail::new(cfg).build(Some(&sprite)).unwrap().is_none());
}

#[test]
fn missing_sprite_builds_nothing() {
    assert!(MeleeWeaponTrail::default().build(None).unwrap().is_none());
}

#[test]
fn unreadable_sprite_fails() {
    let mut tex = Texture::new("locked", PixelBuffer::new(4, 4));
    tex.readable = false;
    let sprite = Sprite::from_texture(Arc::new(tex));
    let err = MeleeWeaponTrail::default().build(Some(&sprite)).unwrap_err();
    assert!(matches!(err, TrailError::Unreadable(_)));
}

// ── Gap filling ───────────────────────────────────────────────────────────

// Rows 0 and 2 hold an edge pixel at x = 5, row 1 is empty.
fn gapped() -> Sprite {
    let mut px = PixelBuffer::new(10, 3);
    px.set(5, 0, Color::WHITE);
    px.set(5, 2, Color::WHITE);
    sprite_of(px)
}

#[test]
fn gaps_filled_only_with_bend() {
    let mut cfg = config(Direction::Right, 0.0, 0.0);
    cfg.remove_gaps = true;
    let out = MeleeWeaponTrail::new(cfg.clone()).build(Some(&gapped())).unwrap().unwrap();
    assert_eq!(out.pixels.get(5, 1), Some(Color::CLEAR));

    cfg.bend = 0.5;
    let out = MeleeWeaponTrail::new(cfg).build(Some(&gapped())).unwrap().unwrap();
    assert_eq!(out.pixels.get(5, 1), Some(Color::WHITE));
}

#[test]
fn gaps_left_alone_without_flag() {
    let cfg = config(Direction::Right, 0.0, 0.5);
    let out = MeleeWeaponTrail::new(cfg).build(Some(&gapped())).unwrap().unwrap();
    assert_eq!(out.pixels.get(5, 1), Some(Color::CLEAR));
}

// ── Pivot & re-use ────────────────────────────────────────────────────────

#[test]
fn pivot_is_rescaled_to_fractions() {
    let mut sprite = sprite_of(PixelBuffer::filled(20, 10, Color::WHITE));
    sprite.pivot = Vec2::new(5.0, 5.0);
    let out = MeleeWeaponTrail::default().build(Some(&sprite)).unwrap().unwrap();
    assert_eq!(out.pivot, Vec2::new(0.25, 0.5));
    assert_eq!(out.pixels_per_unit, 100.0);

    let meta = out.meta();
    assert_eq!((meta.width, meta.height), (20, 10));
}

#[test]
fn trail_can_feed_the_next_build() {
    let mut px = PixelBuffer::new(10, 10);
    px.set(2, 4, Color::WHITE);
    let trail = MeleeWeaponTrail::new(config(Direction::Right, 3.0, 0.0));

    let first = trail.build(Some(&sprite_of(px))).unwrap().unwrap();
    let pivot = first.pivot;
    let again = first.clone().into_sprite("pass1");
    assert_eq!(again.normalized_pivot(), pivot);

    // Pass 1 fades to 2/3 at x = 3 and 1/3 at x = 4; only the former is an edge.
    let second = trail.build(Some(&again)).unwrap().unwrap();
    assert_eq!(second.pixels.get(3, 4), Some(Color::WHITE));
    assert!(second.pixels.get(5, 4).is_some_and(|c| (c.alpha() - 1.0 / 3.0).abs() < 1e-5));
    assert_eq!(second.pixels.get(2, 4), Some(Color::CLEAR));
    assert_eq!(second.pixels.get(6, 4), Some(Color::CLEAR));
}

// ── Config & sheets ───────────────────────────────────────────────────────

#[test]
fn config_json_overrides_defaults() {
    let cfg = TrailConfig::from_json(
        r#"{ "direction": "up", "length": 40, "remove_gaps": true,
             "curve": [ { "time": 0, "value": 1 }, { "time": 1, "value": 0.5 } ] }"#,
    )
    .unwrap();
    assert_eq!(cfg.direction, Direction::Up);
    assert_eq!(cfg.length, 40.0);
    assert_eq!(cfg.bend, 0.25);
    assert!(cfg.remove_gaps);
    assert_eq!(cfg.curve.keys(), &[Keyframe::flat(0.0, 1.0), Keyframe::flat(1.0, 0.5)]);
}

#[test]
fn config_with_oversized_curve_stays_in_buffer() {
    let cfg = TrailConfig::from_json(
        r#"{ "length": 1000, "bend": 0,
             "curve": [ { "time": 0, "value": 200000 }, { "time": 1, "value": 200000 } ] }"#,
    )
    .unwrap();
    let mut px = PixelBuffer::new(4, 4);
    px.set(1, 2, Color::WHITE);

    let out = MeleeWeaponTrail::new(cfg).build(Some(&sprite_of(px))).unwrap().unwrap();
    assert_eq!(out.pixels.count_visible(), 3);
    assert!(out.pixels.get(3, 2).is_some_and(|c| c.alpha() > 0.99));
}

#[test]
fn config_json_rejects_unknown_direction() {
    let err = TrailConfig::from_json(r#"{ "direction": "diagonal" }"#).unwrap_err();
    assert!(matches!(err, TrailError::Json(_)));
}

#[test]
fn sheet_frame_builds_like_a_loose_sprite() {
    // A 2×4 blade stored trimmed at (6, 0) in the sheet, logically 4×4 at offset (1, 0).
    let mut px = PixelBuffer::new(8, 4);
    for y in 0..4 {
        for x in 6..8 {
            px.set(x, y, Color::BLUE);
        }
    }
    let sheet = SpriteSheet::from_json(
        r#"{ "dagger": { "x": 6, "y": 0, "w": 2, "h": 4,
                          "offset_x": 1, "rect_w": 4, "rect_h": 4 } }"#,
        Texture::new("sheet", px),
    )
    .unwrap();

    let trail = MeleeWeaponTrail::new(config(Direction::Left, 2.0, 0.0));
    let out = trail.build(Some(&sheet.sprite("dagger").unwrap())).unwrap().unwrap();

    assert_eq!((out.pixels.width(), out.pixels.height()), (4, 4));
    for y in 0..4 {
        assert_eq!(out.pixels.get(1, y), Some(Color::WHITE));
        assert!(out.pixels.get(0, y).is_some_and(|c| (c.alpha() - 0.5).abs() < 1e-5));
    }
}
