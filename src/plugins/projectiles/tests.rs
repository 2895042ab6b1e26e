use super::*;

#[test]
fn emitter_toggles() {
    let mut emitter = BulletEmitter::default();
    assert!(emitter.is_mounted());
    assert!(!emitter.is_firing());

    emitter.set_firing(true);
    assert!(emitter.is_firing());

    emitter.set_firing(false);
    assert!(!emitter.is_firing());
}

#[test]
fn unmounted_emitter_never_fires() {
    let mut emitter = BulletEmitter::with_mounted(false);
    emitter.set_firing(true);
    assert!(!emitter.is_firing());

    emitter.set_mounted(true);
    assert!(emitter.is_firing());

    emitter.set_mounted(false);
    assert!(!emitter.is_firing());
}

#[test]
fn enemy_bullets_reach_hitbox_and_graze_ring() {
    let layers = enemy_bullet_layers();
    assert!(layers.memberships.has_all(Layer::EnemyBullet));
    assert!(layers.filters.has_all(Layer::Avatar));
    assert!(layers.filters.has_all(Layer::Graze));
}

#[test]
fn player_bullets_never_hit_the_avatar() {
    let layers = player_bullet_layers();
    assert!(!layers.filters.has_all(Layer::Avatar));
    assert!(!layers.filters.has_all(Layer::Graze));
}
