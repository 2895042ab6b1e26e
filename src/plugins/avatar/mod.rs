//! Avatar plugin: the player's ship.
//!
//! Pipeline:
//! - Update (chained, once per frame):
//!   gather input → pause toggle → shooting gate → roll start → timer bank
//!   → movement → roll/hit feedback → blink
//! - FixedPostUpdate (after avian collision events):
//!   hitbox contacts (bullets, pickups) → grazes
//!
//! All avatar state lives in one `AvatarState` component. Other systems find the
//! avatar through the `AvatarEntity` handle and its children through the typed
//! `AvatarParts` handles set at spawn, never by name.
//!
//! Ordering: contacts are resolved against the timers as `Update` last left them.
//! Immunity needs a timer strictly above zero, so a contact resolved after the
//! window has ticked down to zero is a hit.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::audio::{AudioRequest, LoopChannel};
use crate::plugins::camera::ViewportBounds;
use crate::plugins::projectiles::BulletEmitter;
use crate::plugins::stage::StageLedger;

pub mod events;
pub mod invulnerability;
pub mod movement;
pub mod shooting;
pub mod timers;

use invulnerability::{BlinkEffect, Invulnerability, LoopLatch};
use shooting::ShootingGate;
use timers::TimerBank;

pub const TURRET_COUNT: usize = 3;

const SPAWN_POS: Vec2 = Vec2::new(0.0, -260.0);
const HITBOX_RADIUS: f32 = 3.0;
const GRAZE_RADIUS: f32 = 24.0;

#[derive(Component)]
pub struct Avatar;

/// Handle to the live avatar entity.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct AvatarEntity(pub Option<Entity>);

/// Child entities, fixed at spawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct AvatarParts {
    /// Hitbox marker, visible only while slow-moving.
    pub hitbox_marker: Entity,
    /// Shown while rolling.
    pub roll_pipe: Entity,
    /// Sensor ring for graze detection.
    pub graze: Entity,
    pub turrets: [Entity; TURRET_COUNT],
}

/// A sprite that takes part in the post-hit blink.
///
/// `base_alpha` is the opacity restored on full phases.
#[derive(Component, Debug, Clone, Copy)]
pub struct BlinkSprite {
    pub base_alpha: f32,
}

/// Turret slot, 0-based. Turrets `0..count` are shown by `SetTurretCount`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Turret(pub u8);

#[derive(Component, Debug, Clone, Default)]
pub struct AvatarState {
    pub timers: TimerBank,
    pub blink: BlinkEffect,
    pub gate: ShootingGate,
    pub roll_loop: LoopLatch,
    pub hit_loop: LoopLatch,
}

impl AvatarState {
    #[inline]
    pub fn invulnerability(&self) -> Invulnerability {
        Invulnerability::of(&self.timers)
    }

    #[inline]
    pub fn is_firing(&self) -> bool {
        self.gate.is_firing()
    }

    /// Return to a fresh post-activation state.
    ///
    /// Clears invincibility, cancels the blink and closes every looping cue.
    /// Returns the stop requests for cues that were playing.
    pub fn reset(&mut self) -> Vec<AudioRequest> {
        self.timers.start_invincibility(0.0);
        self.blink.cancel();

        let mut stops = Vec::new();
        if self.gate.close().is_some() {
            stops.push(AudioRequest::StopLoop(LoopChannel::Shooting));
        }
        if self.roll_loop.set(false).is_some() {
            stops.push(AudioRequest::StopLoop(LoopChannel::Roll));
        }
        if self.hit_loop.set(false).is_some() {
            stops.push(AudioRequest::StopLoop(LoopChannel::Hit));
        }
        stops
    }
}

/// Sampled input for this frame.
#[derive(Resource, Default, Debug, Clone)]
pub struct AvatarInput {
    /// Raw axes in roughly [-1, 1]; normalized by the movement resolver.
    pub move_axis: Vec2,
    pub fire_held: bool,
    pub slow_held: bool,
    pub roll_pressed: bool,
    pub pause_pressed: bool,
}

/// Reactivate the avatar (respawn, scene re-entry).
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct AvatarReset;

/// Mount and show turrets `0..count`; unmount and hide the rest. Counts above three
/// saturate.
#[derive(Message, Clone, Copy, Debug)]
pub struct SetTurretCount(pub u8);

pub fn plugin(app: &mut App) {
    app.insert_resource(AvatarInput::default())
        .insert_resource(AvatarEntity::default())
        .add_message::<AvatarReset>()
        .add_message::<SetTurretCount>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            Update,
            (gather_input, toggle_pause)
                .chain()
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            (
                apply_reset,
                apply_turret_count,
                evaluate_shooting_gate,
                try_start_roll,
                advance_timers,
                apply_movement,
                update_feedback,
                advance_blink,
            )
                .chain()
                .after(toggle_pause)
                .run_if(in_state(GameState::InGame))
                .run_if(stage_running),
        )
        .add_systems(
            FixedPostUpdate,
            (events::resolve_avatar_contacts, events::resolve_grazes)
                .chain()
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame))
                .run_if(stage_running),
        );
}

fn stage_running(ledger: Res<StageLedger>) -> bool {
    !ledger.paused
}

#[inline]
fn hitbox_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Avatar, [Layer::EnemyBullet, Layer::Pickup])
}

#[inline]
fn graze_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Graze, [Layer::EnemyBullet])
}

fn spawn(mut commands: Commands, mut handle: ResMut<AvatarEntity>) {
    let body_color = Color::srgb(0.2, 0.75, 0.9);

    let avatar = commands
        .spawn((
            Name::new("Avatar"),
            Avatar,
            AvatarState::default(),
            BlinkSprite { base_alpha: 1.0 },
            Sprite {
                color: body_color,
                custom_size: Some(Vec2::new(22.0, 28.0)),
                ..default()
            },
            Transform::from_translation(SPAWN_POS.extend(1.0)),
            RigidBody::Kinematic,
            Collider::circle(HITBOX_RADIUS),
            // Report contacts only; bullets are never pushed by the hitbox.
            Sensor,
            hitbox_layers(),
            // Contacts on the hitbox arrive as CollisionStart messages.
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    let hitbox_marker = commands
        .spawn((
            Name::new("Hitbox"),
            BlinkSprite { base_alpha: 1.0 },
            Sprite {
                color: Color::WHITE,
                custom_size: Some(Vec2::splat(HITBOX_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 0.2),
            Visibility::Hidden,
            ChildOf(avatar),
        ))
        .id();

    let roll_pipe = commands
        .spawn((
            Name::new("RollPipe"),
            BlinkSprite { base_alpha: 0.6 },
            Sprite {
                color: Color::srgba(0.6, 0.9, 1.0, 0.6),
                custom_size: Some(Vec2::new(40.0, 6.0)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, -0.1),
            Visibility::Hidden,
            ChildOf(avatar),
        ))
        .id();

    let graze = commands
        .spawn((
            Name::new("GrazeRing"),
            Transform::default(),
            Collider::circle(GRAZE_RADIUS),
            Sensor,
            graze_layers(),
            CollidingEntities::default(),
            ChildOf(avatar),
        ))
        .id();

    let turret_x = [0.0_f32, -14.0, 14.0];
    let turrets: [Entity; TURRET_COUNT] = std::array::from_fn(|i| {
        commands
            .spawn((
                Name::new(format!("Turret{}", i + 1)),
                Turret(i as u8),
                BulletEmitter::with_mounted(i == 0),
                BlinkSprite { base_alpha: 1.0 },
                Sprite {
                    color: Color::srgb(0.85, 0.85, 0.95),
                    custom_size: Some(Vec2::new(6.0, 12.0)),
                    ..default()
                },
                Transform::from_xyz(turret_x[i], 10.0, 0.1),
                // Only the first turret is mounted until told otherwise.
                if i == 0 { Visibility::Inherited } else { Visibility::Hidden },
                ChildOf(avatar),
            ))
            .id()
    });

    commands.entity(avatar).insert(AvatarParts {
        hitbox_marker,
        roll_pipe,
        graze,
        turrets,
    });

    handle.0 = Some(avatar);
    info!("avatar spawned");
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<AvatarInput>) {
    // Headless apps have no keyboard; leave whatever was written directly.
    let Some(keys) = keys else {
        return;
    };

    let mut axis = Vec2::ZERO;

    if keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]) {
        axis.y += 1.0;
    }
    if keys.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]) {
        axis.y -= 1.0;
    }
    if keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        axis.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        axis.x += 1.0;
    }

    input.move_axis = axis;
    input.fire_held = keys.pressed(KeyCode::KeyZ);
    input.slow_held = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    input.roll_pressed = keys.just_pressed(KeyCode::Space);
    input.pause_pressed = keys.just_pressed(KeyCode::Escape);
}

fn toggle_pause(input: Res<AvatarInput>, mut ledger: ResMut<StageLedger>) {
    if !input.pause_pressed {
        return;
    }
    if ledger.toggle_pause() {
        debug!("pause toggled: {}", ledger.paused);
    }
}

fn apply_reset(
    mut resets: MessageReader<AvatarReset>,
    mut audio: MessageWriter<AudioRequest>,
    mut q_avatar: Query<&mut AvatarState, With<Avatar>>,
    mut q_sprites: Query<(&mut Sprite, &BlinkSprite)>,
) {
    if resets.read().count() == 0 {
        return;
    }
    let Ok(mut state) = q_avatar.single_mut() else {
        return;
    };

    for stop in state.reset() {
        audio.write(stop);
    }
    for (mut sprite, blink) in &mut q_sprites {
        set_alpha(&mut sprite, blink.base_alpha);
    }
    debug!("avatar reset");
}

fn apply_turret_count(
    mut requests: MessageReader<SetTurretCount>,
    q_avatar: Query<&AvatarParts, With<Avatar>>,
    mut q_turrets: Query<(&Turret, &mut Visibility, &mut BulletEmitter)>,
) {
    let Some(SetTurretCount(count)) = requests.read().last().copied() else {
        return;
    };
    let Ok(parts) = q_avatar.single() else {
        return;
    };

    for e in parts.turrets {
        let Ok((turret, mut vis, mut emitter)) = q_turrets.get_mut(e) else {
            continue;
        };
        let mounted = turret.0 < count;
        emitter.set_mounted(mounted);
        *vis = visible_if(mounted);
    }
    debug!("turret count set to {}", count.min(TURRET_COUNT as u8));
}

fn evaluate_shooting_gate(
    input: Res<AvatarInput>,
    ledger: Res<StageLedger>,
    mut audio: MessageWriter<AudioRequest>,
    mut q_avatar: Query<(&mut AvatarState, &AvatarParts), With<Avatar>>,
    mut q_emitters: Query<&mut BulletEmitter>,
) {
    let Ok((mut state, parts)) = q_avatar.single_mut() else {
        return;
    };

    let out = state.gate.evaluate(input.fire_held, ledger.dialogue_active);

    for e in parts.turrets {
        if let Ok(mut emitter) = q_emitters.get_mut(e) {
            emitter.set_firing(out.enabled);
        }
    }

    if let Some(on) = out.edge {
        audio.write(AudioRequest::for_edge(LoopChannel::Shooting, on));
    }
}

fn try_start_roll(
    input: Res<AvatarInput>,
    tunables: Res<Tunables>,
    mut ledger: ResMut<StageLedger>,
    mut q_avatar: Query<&mut AvatarState, With<Avatar>>,
) {
    if !input.roll_pressed {
        return;
    }
    let Ok(mut state) = q_avatar.single_mut() else {
        return;
    };

    if state.timers.start_roll(&mut ledger, &tunables) {
        info!("roll started");
    } else {
        debug!("roll refused: charge {}/{}", ledger.roll_charge, tunables.roll_charge_threshold);
    }
}

fn advance_timers(time: Res<Time>, mut q_avatar: Query<&mut AvatarState, With<Avatar>>) {
    let Ok(mut state) = q_avatar.single_mut() else {
        return;
    };
    state.timers.advance(time.delta_secs());
}

fn apply_movement(
    time: Res<Time>,
    tunables: Res<Tunables>,
    bounds: Res<ViewportBounds>,
    input: Res<AvatarInput>,
    mut q_avatar: Query<(&mut Transform, &AvatarState), With<Avatar>>,
) {
    let Ok((mut tf, state)) = q_avatar.single_mut() else {
        return;
    };

    let next = movement::resolve(
        tf.translation.truncate(),
        input.move_axis,
        input.slow_held,
        state.timers.is_rolling(),
        time.delta_secs(),
        bounds.0,
        &tunables,
    );
    tf.translation.x = next.x;
    tf.translation.y = next.y;
    tf.rotation = movement::roll_rotation(state.timers.roll_progress(tunables.roll_time_max));
}

/// Roll pipe, hitbox marker, and the roll/hit looping cues.
fn update_feedback(
    input: Res<AvatarInput>,
    mut audio: MessageWriter<AudioRequest>,
    mut q_avatar: Query<(&mut AvatarState, &AvatarParts), With<Avatar>>,
    mut q_vis: Query<&mut Visibility>,
) {
    let Ok((mut state, parts)) = q_avatar.single_mut() else {
        return;
    };

    let rolling = state.timers.is_rolling();
    if let Ok(mut vis) = q_vis.get_mut(parts.roll_pipe) {
        *vis = visible_if(rolling);
    }
    if let Ok(mut vis) = q_vis.get_mut(parts.hitbox_marker) {
        *vis = visible_if(input.slow_held);
    }

    if let Some(on) = state.roll_loop.set(rolling) {
        audio.write(AudioRequest::for_edge(LoopChannel::Roll, on));
    }

    let invincible = state.invulnerability() == Invulnerability::PostHitInvincible;
    if let Some(on) = state.hit_loop.set(invincible) {
        audio.write(AudioRequest::for_edge(LoopChannel::Hit, on));
    }
}

fn advance_blink(
    tunables: Res<Tunables>,
    mut q_avatar: Query<&mut AvatarState, With<Avatar>>,
    mut q_sprites: Query<(&mut Sprite, &BlinkSprite)>,
) {
    let Ok(mut state) = q_avatar.single_mut() else {
        return;
    };
    if !state.blink.is_active() {
        return;
    }

    let dimmed = state.blink.tick();
    for (mut sprite, blink) in &mut q_sprites {
        let alpha = if dimmed { tunables.blink_dim_alpha } else { blink.base_alpha };
        set_alpha(&mut sprite, alpha);
    }
}

#[inline]
fn visible_if(on: bool) -> Visibility {
    if on { Visibility::Inherited } else { Visibility::Hidden }
}

#[inline]
fn set_alpha(sprite: &mut Sprite, alpha: f32) {
    let mut c = sprite.color.to_srgba();
    c.alpha = alpha;
    sprite.color = c.into();
}
