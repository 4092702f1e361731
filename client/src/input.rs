//! Keyboard mapping from held keys to per-frame control impulses

use shared::Controls;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Logical keys the simulation cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
}

/// Keys currently held down, fed by the host window's key events.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: HashSet<Key>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
}

/// Binding of the four control impulses to keys for one car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub accelerate: Key,
    pub brake: Key,
    pub steer_left: Key,
    pub steer_right: Key,
}

impl KeyBindings {
    /// WASD, the first locally-controlled car.
    pub fn primary() -> Self {
        Self {
            accelerate: Key::W,
            brake: Key::S,
            steer_left: Key::A,
            steer_right: Key::D,
        }
    }

    /// Arrow keys, the second car in same-keyboard mode.
    pub fn secondary() -> Self {
        Self {
            accelerate: Key::Up,
            brake: Key::Down,
            steer_left: Key::Left,
            steer_right: Key::Right,
        }
    }

    pub fn controls(&self, held: &HeldKeys) -> Controls {
        Controls {
            accelerate: held.is_down(self.accelerate),
            brake: held.is_down(self.brake),
            steer_left: held.is_down(self.steer_left),
            steer_right: held.is_down(self.steer_right),
        }
    }
}

/// Per-frame source of control impulses for one car.
pub trait ControlSource: Send {
    fn sample(&mut self) -> Controls;
}

/// Samples a shared held-key set through one binding map. The rendering
/// collaborator owns the other end of the `Arc` and feeds it key events.
pub struct KeyboardControls {
    held: Arc<Mutex<HeldKeys>>,
    bindings: KeyBindings,
}

impl KeyboardControls {
    pub fn new(held: Arc<Mutex<HeldKeys>>, bindings: KeyBindings) -> Self {
        Self { held, bindings }
    }
}

impl ControlSource for KeyboardControls {
    fn sample(&mut self) -> Controls {
        match self.held.lock() {
            Ok(held) => self.bindings.controls(&held),
            Err(_) => Controls::default(),
        }
    }
}

/// Replays a fixed schedule of `(frames, controls)` phases, cycling forever.
/// Drives the headless demo binary and tests.
pub struct ScriptedControls {
    script: Vec<(u32, Controls)>,
    phase: usize,
    remaining: u32,
}

impl ScriptedControls {
    pub fn new(mut script: Vec<(u32, Controls)>) -> Self {
        script.retain(|(frames, _)| *frames > 0);
        let remaining = script.first().map(|(frames, _)| *frames).unwrap_or(0);
        Self {
            script,
            phase: 0,
            remaining,
        }
    }

    /// Holds one control set on every frame.
    pub fn hold(controls: Controls) -> Self {
        Self::new(vec![(u32::MAX, controls)])
    }
}

impl ControlSource for ScriptedControls {
    fn sample(&mut self) -> Controls {
        if self.script.is_empty() {
            return Controls::default();
        }

        if self.remaining == 0 {
            self.phase = (self.phase + 1) % self.script.len();
            self.remaining = self.script[self.phase].0;
        }
        self.remaining -= 1;
        self.script[self.phase].1
    }
}
