//! Audio: request messages from gameplay, and the playback backend.
//!
//! Gameplay only writes `AudioRequest`s. It never touches sinks or handles,
//! so headless apps register the message and simply never consume it.
//!
//! ```text
//! avatar systems ──AudioRequest──▶ play_audio_requests (render only)
//!                                   - Play      → AudioPlayer + DESPAWN
//!                                   - StartLoop → AudioPlayer + LOOP + LoopingCue
//!                                   - StopLoop  → despawn matching LoopingCue
//! ```

use bevy::platform::collections::{HashMap, HashSet};
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OneShot {
    Death,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopChannel {
    Shooting,
    Roll,
    /// Plays for the whole post-hit invincibility window.
    Hit,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioRequest {
    Play(OneShot),
    StartLoop(LoopChannel),
    StopLoop(LoopChannel),
}

impl AudioRequest {
    /// Translate a latch edge into a start/stop request.
    #[inline]
    pub fn for_edge(channel: LoopChannel, on: bool) -> Self {
        if on {
            AudioRequest::StartLoop(channel)
        } else {
            AudioRequest::StopLoop(channel)
        }
    }
}

/// Register the request message. Safe for headless apps.
pub fn plugin(app: &mut App) {
    app.add_message::<AudioRequest>();
}

/// Playback backend (needs the audio plugin from `DefaultPlugins`).
pub fn backend_plugin(app: &mut App) {
    app.add_systems(Startup, load_audio)
        .add_systems(PostUpdate, play_audio_requests);
}

#[derive(Resource)]
pub struct GameAudio {
    pub death: Handle<AudioSource>,
    pub hit: Handle<AudioSource>,
    pub shooting: Handle<AudioSource>,
    pub roll: Handle<AudioSource>,
}

impl GameAudio {
    fn one_shot(&self, cue: OneShot) -> Handle<AudioSource> {
        match cue {
            OneShot::Death => self.death.clone(),
        }
    }

    fn looping(&self, channel: LoopChannel) -> Handle<AudioSource> {
        match channel {
            LoopChannel::Shooting => self.shooting.clone(),
            LoopChannel::Roll => self.roll.clone(),
            LoopChannel::Hit => self.hit.clone(),
        }
    }
}

/// Marks the entity currently playing a looping channel.
#[derive(Component, Debug, Clone, Copy)]
pub struct LoopingCue(pub LoopChannel);

fn load_audio(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(GameAudio {
        death: asset_server.load("audio/death.wav"),
        hit: asset_server.load("audio/hit.wav"),
        shooting: asset_server.load("audio/shooting.wav"),
        roll: asset_server.load("audio/roll.wav"),
    });
}

fn play_audio_requests(
    mut commands: Commands,
    audio: Option<Res<GameAudio>>,
    mut requests: MessageReader<AudioRequest>,
    q_loops: Query<(Entity, &LoopingCue)>,
) {
    let Some(audio) = audio else {
        requests.clear();
        return;
    };

    // Despawns are deferred, so `q_loops` still lists loops stopped earlier in this
    // batch and misses loops started earlier in it. Track both here.
    let mut stopped: HashSet<LoopChannel> = HashSet::default();
    let mut started: HashMap<LoopChannel, Entity> = HashMap::default();

    for req in requests.read() {
        match *req {
            AudioRequest::Play(cue) => {
                commands.spawn((AudioPlayer::new(audio.one_shot(cue)), PlaybackSettings::DESPAWN));
            }
            AudioRequest::StartLoop(channel) => {
                let playing = started.contains_key(&channel)
                    || (!stopped.contains(&channel)
                        && q_loops.iter().any(|(_, cue)| cue.0 == channel));
                if playing {
                    continue;
                }
                let e = commands
                    .spawn((
                        Name::new(format!("Loop({channel:?})")),
                        AudioPlayer::new(audio.looping(channel)),
                        PlaybackSettings::LOOP,
                        LoopingCue(channel),
                    ))
                    .id();
                started.insert(channel, e);
            }
            AudioRequest::StopLoop(channel) => {
                if stopped.insert(channel) {
                    for (e, cue) in &q_loops {
                        if cue.0 == channel {
                            commands.entity(e).despawn();
                        }
                    }
                }
                if let Some(e) = started.remove(&channel) {
                    commands.entity(e).despawn();
                }
            }
        }
    }
}
