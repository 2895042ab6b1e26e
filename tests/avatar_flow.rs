mod common;

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;
use punch_hell::common::tunables::Tunables;
use punch_hell::plugins::audio::{AudioRequest, OneShot};
use punch_hell::plugins::avatar::events::resolve_avatar_contacts;
use punch_hell::plugins::avatar::invulnerability::Invulnerability;
use punch_hell::plugins::avatar::{Avatar, AvatarEntity, AvatarParts, AvatarState, SetTurretCount};
use punch_hell::plugins::camera::ViewportBounds;
use punch_hell::plugins::pickups::{Pickup, PickupKind};
use punch_hell::plugins::projectiles::{BulletEmitter, EnemyBullet};
use punch_hell::plugins::stage::StageLedger;

#[test]
fn roll_consumes_full_charge() {
    let (mut app, avatar) = common::app_in_game();
    app.world_mut().resource_mut::<StageLedger>().roll_charge = 120;

    common::set_input(&mut app, |i| i.roll_pressed = true);
    app.update();
    common::set_input(&mut app, |i| i.roll_pressed = false);
    app.update();

    assert_eq!(app.world().resource::<StageLedger>().roll_charge, 0);
    assert_eq!(
        common::avatar_state(&app, avatar).invulnerability(),
        Invulnerability::Rolling
    );
}

#[test]
fn holding_fire_arms_every_fitted_turret() {
    let (mut app, avatar) = common::app_in_game();

    app.world_mut().write_message(SetTurretCount(3));
    common::set_input(&mut app, |i| i.fire_held = true);
    app.update();

    let parts = *app.world().get::<AvatarParts>(avatar).unwrap();
    for e in parts.turrets {
        assert!(app.world().get::<BulletEmitter>(e).unwrap().is_firing());
    }

    app.world_mut().resource_mut::<StageLedger>().dialogue_active = true;
    app.update();

    for e in parts.turrets {
        assert!(!app.world().get::<BulletEmitter>(e).unwrap().is_firing());
    }
}

#[test]
fn spare_turrets_stay_quiet_until_fitted() {
    let (mut app, avatar) = common::app_in_game();

    common::set_input(&mut app, |i| i.fire_held = true);
    app.update();

    let parts = *app.world().get::<AvatarParts>(avatar).unwrap();
    let firing: Vec<bool> = parts
        .turrets
        .iter()
        .map(|e| app.world().get::<BulletEmitter>(*e).unwrap().is_firing())
        .collect();
    assert_eq!(firing, vec![true, false, false]);
}

#[test]
fn avatar_stays_inside_the_viewport() {
    let (mut app, avatar) = common::app_in_game();
    app.world_mut()
        .insert_resource(ViewportBounds(Rect::new(-10.0, -300.0, 10.0, 300.0)));
    // Start against the left edge.
    app.world_mut()
        .get_mut::<Transform>(avatar)
        .unwrap()
        .translation
        .x = -10.0;

    common::set_input(&mut app, |i| i.move_axis = Vec2::new(-1.0, 0.0));
    for _ in 0..10 {
        app.update();
    }

    let p = app.world().get::<Transform>(avatar).unwrap().translation;
    assert_eq!(p.x, -10.0);
}

#[test]
fn pause_freezes_the_avatar() {
    let (mut app, avatar) = common::app_in_game();

    common::set_input(&mut app, |i| i.pause_pressed = true);
    app.update();
    assert!(app.world().resource::<StageLedger>().paused);
    assert!(app.world().resource::<Time<Virtual>>().is_paused());

    // Charge and input are there, but nothing runs while paused.
    app.world_mut().resource_mut::<StageLedger>().roll_charge = 100;
    common::set_input(&mut app, |i| {
        i.pause_pressed = false;
        i.roll_pressed = true;
    });
    app.update();

    assert_eq!(app.world().resource::<StageLedger>().roll_charge, 100);
    assert!(!common::avatar_state(&app, avatar).timers.is_rolling());

    common::set_input(&mut app, |i| {
        i.pause_pressed = true;
        i.roll_pressed = false;
    });
    app.update();
    assert!(!app.world().resource::<StageLedger>().paused);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
}

/// Contact resolution on its own, with avatar and contacts assembled by hand.
fn contact_app() -> (App, Entity) {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_systems(PostUpdate, resolve_avatar_contacts);

    // Messages backing storage must exist for the reader and writer.
    app.world_mut().init_resource::<Messages<CollisionStart>>();
    app.world_mut().init_resource::<Messages<AudioRequest>>();
    app.world_mut().insert_resource(Tunables::default());
    app.world_mut().insert_resource(StageLedger::default());

    let world = app.world_mut();
    let turrets = [
        world.spawn(BulletEmitter::default()).id(),
        world.spawn(BulletEmitter::default()).id(),
        world.spawn(BulletEmitter::default()).id(),
    ];
    let hitbox_marker = world.spawn_empty().id();
    let roll_pipe = world.spawn_empty().id();
    let graze = world.spawn_empty().id();
    let avatar = world
        .spawn((
            Avatar,
            AvatarState::default(),
            AvatarParts {
                hitbox_marker,
                roll_pipe,
                graze,
                turrets,
            },
        ))
        .id();
    world.insert_resource(AvatarEntity(Some(avatar)));

    (app, avatar)
}

fn hit(app: &mut App, avatar: Entity, other: Entity) {
    app.world_mut().write_message(CollisionStart {
        collider1: other,
        collider2: avatar,
        body1: None,
        body2: Some(avatar),
    });
}

#[test]
fn second_hit_inside_invincibility_is_free() {
    let (mut app, avatar) = contact_app();

    let first = app.world_mut().spawn(EnemyBullet).id();
    hit(&mut app, avatar, first);
    app.update();

    assert_eq!(app.world().resource::<StageLedger>().lives_remaining, 2);
    assert!(app.world().get_entity(first).is_err());

    // One second later the two second window is still open.
    app.world_mut()
        .get_mut::<AvatarState>(avatar)
        .unwrap()
        .timers
        .advance(1.0);
    assert_eq!(
        common::avatar_state(&app, avatar).invulnerability(),
        Invulnerability::PostHitInvincible
    );

    let second = app.world_mut().spawn(EnemyBullet).id();
    hit(&mut app, avatar, second);
    app.update();

    assert_eq!(app.world().resource::<StageLedger>().lives_remaining, 2);
    assert!(app.world().get_entity(second).is_err());
    assert!(common::avatar_state(&app, avatar).blink.is_active());
}

#[test]
fn power_pickup_is_collected() {
    let (mut app, avatar) = contact_app();

    let pickup = app.world_mut().spawn((Pickup, PickupKind::Power)).id();
    hit(&mut app, avatar, pickup);
    app.update();

    let ledger = app.world().resource::<StageLedger>();
    assert_eq!(ledger.power, 10);
    assert_eq!(ledger.lives_remaining, 3);
    assert!(app.world().get_entity(pickup).is_err());
}

#[test]
fn death_cue_is_requested_on_a_hit() {
    let (mut app, avatar) = contact_app();

    let bullet = app.world_mut().spawn(EnemyBullet).id();
    hit(&mut app, avatar, bullet);
    app.update();

    let requests: Vec<AudioRequest> = app
        .world_mut()
        .resource_mut::<Messages<AudioRequest>>()
        .drain()
        .collect();
    assert_eq!(requests, vec![AudioRequest::Play(OneShot::Death)]);
}
