//! Audio cue sink
//!
//! Turns simulation events into sound cues for whatever backend plays them.
//! Nothing here blocks or touches a device: cues are queued and a consumer
//! drains them once per frame.

use std::collections::VecDeque;

use crate::driver::{SimulationObserver, TickFrame};
use crate::sim::SimulationEvent;

/// Most cues kept between drains; the oldest are dropped first
pub const MAX_QUEUED_CUES: usize = 64;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Entity bounced off the ring
    WallBounce,
    /// Predator ate a prey
    Capture,
    /// Capture count hit a milestone
    Milestone,
    /// Predator filled the arena
    Victory,
}

impl SoundCue {
    /// Cue for an event, if it makes a sound
    pub fn for_event(event: &SimulationEvent) -> Option<Self> {
        match event {
            SimulationEvent::WallContact { .. } => Some(SoundCue::WallBounce),
            SimulationEvent::PredatorGrew { .. } => Some(SoundCue::Capture),
            SimulationEvent::MilestoneReached { .. } => Some(SoundCue::Milestone),
            SimulationEvent::GameOver { .. } => Some(SoundCue::Victory),
            SimulationEvent::EntityRemoved { .. }
            | SimulationEvent::EntitySpawned { .. }
            | SimulationEvent::PredatorRelocated { .. } => None,
        }
    }
}

/// A cue ready to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedCue {
    pub cue: SoundCue,
    pub tick: u64,
    /// Effective volume at queue time (0.0 - 1.0)
    pub volume: f32,
}

/// Bounded cue queue with master/sfx volume and mute
#[derive(Debug)]
pub struct AudioCueQueue {
    queue: VecDeque<QueuedCue>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    dropped: u64,
}

impl Default for AudioCueQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCueQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(MAX_QUEUED_CUES),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            dropped: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue cues for one tick's events. Each cue sounds at most once per tick.
    pub fn push_events(&mut self, tick: u64, events: &[SimulationEvent]) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }

        let mut seen: Vec<SoundCue> = Vec::new();
        for cue in events.iter().filter_map(SoundCue::for_event) {
            if seen.contains(&cue) {
                continue;
            }
            seen.push(cue);

            if self.queue.len() == MAX_QUEUED_CUES {
                self.queue.pop_front();
                self.dropped += 1;
            }
            self.queue.push_back(QueuedCue { cue, tick, volume });
        }
    }

    /// Take every queued cue, oldest first
    pub fn drain(&mut self) -> Vec<QueuedCue> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Cues discarded because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl SimulationObserver for AudioCueQueue {
    fn on_tick(&mut self, frame: &TickFrame<'_>) {
        self.push_events(frame.tick, frame.events);
    }

    fn on_reset(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EntityId, GameOverReason};

    fn wall(id: u32) -> SimulationEvent {
        SimulationEvent::WallContact {
            entity_id: EntityId(id),
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let mut q = AudioCueQueue::new();
        q.push_events(
            1,
            &[
                SimulationEvent::PredatorGrew {
                    id: EntityId(0),
                    new_radius: 24.24,
                },
                SimulationEvent::EntityRemoved { id: EntityId(3) },
                SimulationEvent::MilestoneReached { eaten: 5 },
                SimulationEvent::GameOver {
                    reason: GameOverReason::ArenaFilled {
                        predator: EntityId(0),
                    },
                },
            ],
        );
        let cues: Vec<SoundCue> = q.drain().into_iter().map(|c| c.cue).collect();
        assert_eq!(
            cues,
            vec![SoundCue::Capture, SoundCue::Milestone, SoundCue::Victory]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn test_duplicate_cues_coalesce_within_a_tick() {
        let mut q = AudioCueQueue::new();
        q.push_events(7, &[wall(1), wall(2), wall(3)]);
        q.push_events(8, &[wall(1)]);
        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].tick, 7);
        assert_eq!(drained[1].tick, 8);
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut q = AudioCueQueue::new();
        for tick in 0..(MAX_QUEUED_CUES as u64 + 10) {
            q.push_events(tick, &[wall(0)]);
        }
        assert_eq!(q.len(), MAX_QUEUED_CUES);
        assert_eq!(q.dropped(), 10);
        assert_eq!(q.drain()[0].tick, 10);
    }

    #[test]
    fn test_volume_and_mute() {
        let mut q = AudioCueQueue::new();
        q.set_master_volume(2.0);
        q.set_sfx_volume(0.5);
        assert!((q.effective_volume() - 0.5).abs() < 1e-6);

        q.push_events(1, &[wall(0)]);
        assert!((q.drain()[0].volume - 0.5).abs() < 1e-6);

        q.set_muted(true);
        q.push_events(2, &[wall(0)]);
        assert!(q.is_empty());
    }
}
