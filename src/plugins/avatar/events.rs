//! Event resolver: damaging collisions, grazes, pickups.
//!
//! The `on_*` functions are the rules. They mutate avatar state and the ledger
//! and report what the caller must do to the outside world (sound, despawn).
//! The systems below are the glue that turns avian contacts into calls.
//!
//! ```text
//! FixedPostUpdate (after avian collision events)
//!   resolve_avatar_contacts: CollisionStart on the hitbox
//!     - EnemyBullet → on_damaging_collision → death cue on a hit,
//!                     bullet despawned either way
//!     - Pickup      → on_pickup → despawn pickup
//!   resolve_grazes: any enemy bullet inside the graze ring → on_graze(dt),
//!                   once per tick however many bullets are inside
//! ```

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::audio::{AudioRequest, OneShot};
use crate::plugins::pickups::{Pickup, PickupKind};
use crate::plugins::projectiles::{EnemyBullet, PlayerBullet};
use crate::plugins::stage::StageLedger;

use super::{AvatarEntity, AvatarParts, AvatarState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Rolling or post-hit invincible. Avatar and ledger are untouched.
    Immune,
    /// A life was lost. The caller plays the death cue.
    Hit,
}

/// Resolve an enemy bullet touching the hitbox.
pub fn on_damaging_collision(
    state: &mut AvatarState,
    ledger: &mut StageLedger,
    tunables: &Tunables,
) -> HitOutcome {
    if !state.invulnerability().is_vulnerable() {
        return HitOutcome::Immune;
    }

    ledger.lose_life();
    state.timers.start_invincibility(tunables.invincibility_time);
    state
        .blink
        .start(tunables.blink_cycles, tunables.blink_ticks_per_phase);
    HitOutcome::Hit
}

/// Resolve one graze contact lasting `dt`. Returns whether it scored.
///
/// A graze scores and charges the roll by the same amount.
pub fn on_graze(
    state: &mut AvatarState,
    ledger: &mut StageLedger,
    tunables: &Tunables,
    dt: f32,
) -> bool {
    if !state.timers.try_graze(dt, tunables.graze_cooldown) {
        return false;
    }

    ledger.add_score(u64::from(tunables.score_per_graze));
    ledger.add_roll(tunables.score_per_graze);
    true
}

/// Resolve touching a pickup. Returns whether the pickup should be removed.
///
/// `None` is a pickup with no recognised kind: no effect, not removed.
pub fn on_pickup(kind: Option<PickupKind>, ledger: &mut StageLedger, tunables: &Tunables) -> bool {
    match kind {
        Some(PickupKind::Power) => ledger.add_power(tunables.power_per_pickup),
        Some(PickupKind::Point) => ledger.add_score(tunables.score_per_drop),
        Some(PickupKind::BulletPoint) => ledger.add_score(tunables.score_per_destroyed_bullet),
        None => return false,
    }
    true
}

/// Whether `bullet` was fired by one of this avatar's turret emitters.
#[inline]
pub fn is_player_bullet(parts: &AvatarParts, bullet: &PlayerBullet) -> bool {
    parts.turrets.contains(&bullet.emitter)
}

/// Classify contacts that start on the avatar hitbox and resolve them.
pub fn resolve_avatar_contacts(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    handle: Res<AvatarEntity>,
    tunables: Res<Tunables>,
    mut ledger: ResMut<StageLedger>,
    mut audio: MessageWriter<AudioRequest>,
    mut q_avatar: Query<(&mut AvatarState, &AvatarParts)>,
    q_enemy_bullets: Query<(), With<EnemyBullet>>,
    q_player_bullets: Query<&PlayerBullet>,
    q_pickups: Query<Option<&PickupKind>, With<Pickup>>,
    // Per-frame dedupe: one resolution per touching entity.
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    let Some(avatar) = handle.0 else {
        started.clear();
        return;
    };
    let Ok((mut state, parts)) = q_avatar.get_mut(avatar) else {
        started.clear();
        return;
    };

    for ev in started.read() {
        let other = if ev.collider1 == avatar {
            ev.collider2
        } else if ev.collider2 == avatar {
            ev.collider1
        } else {
            continue;
        };

        if !seen.insert(other) {
            continue;
        }

        if let Ok(own) = q_player_bullets.get(other) {
            if is_player_bullet(parts, own) {
                continue;
            }
        }

        if q_enemy_bullets.contains(other) {
            match on_damaging_collision(&mut state, &mut ledger, &tunables) {
                HitOutcome::Immune => {
                    debug!("hit ignored while {:?}", state.invulnerability());
                }
                HitOutcome::Hit => {
                    info!("avatar hit, {} lives remaining", ledger.lives_remaining);
                    audio.write(AudioRequest::Play(OneShot::Death));
                }
            }
            // The contact is consumed either way.
            commands.entity(other).despawn();
            continue;
        }

        if let Ok(kind) = q_pickups.get(other) {
            let kind = kind.copied();
            if on_pickup(kind, &mut ledger, &tunables) {
                debug!("collected {kind:?}");
                commands.entity(other).despawn();
            }
        }
    }
}

/// Score a graze while any enemy bullet is inside the graze ring.
///
/// The cooldown measures elapsed time, so the ring feeds it `dt` once per tick
/// no matter how many bullets it holds.
pub fn resolve_grazes(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut ledger: ResMut<StageLedger>,
    mut q_avatar: Query<(&mut AvatarState, &AvatarParts)>,
    q_ring: Query<&CollidingEntities>,
    q_enemy_bullets: Query<(), With<EnemyBullet>>,
) {
    let Ok((mut state, parts)) = q_avatar.single_mut() else {
        return;
    };
    let Ok(colliding) = q_ring.get(parts.graze) else {
        return;
    };

    let grazing = colliding.iter().any(|e| q_enemy_bullets.contains(*e));
    if grazing {
        on_graze(&mut state, &mut ledger, &tunables, time.delta_secs());
    }
}
