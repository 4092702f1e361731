use serde::{Deserialize, Serialize};

pub mod protocol;

pub const WIDTH: f64 = 1200.0;
pub const HEIGHT: f64 = 800.0;
pub const ACCELERATION: f64 = 0.2;
pub const FRICTION: f64 = 0.98;
pub const STEER_SPEED: f64 = 3.0;
pub const MAX_SPEED: f64 = 8.0;
pub const STOP_THRESHOLD: f64 = 0.05;
pub const SPAWN_X: f64 = 400.0;
pub const SPAWN_Y: f64 = 300.0;

/// Per-frame boolean impulses for one controlled car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

/// The kinematic subset of a player's state that physics acts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub speed: f64,
}

/// Advances one car by one frame. Pure: same inputs, same output.
///
/// Order matters and is fixed: impulses adjust speed and heading, friction
/// damps, speed is clamped and snapped to zero below the stop threshold,
/// position integrates, then wraps. Friction applies every frame whether or
/// not any impulse is active, so a coasting car always decelerates to rest.
/// Heading is degrees and is never normalized; only its sine and cosine are
/// ever used.
pub fn step(state: &Kinematics, controls: &Controls) -> Kinematics {
    let mut speed = state.speed;
    let mut rotation = state.rotation;

    if controls.accelerate {
        speed += ACCELERATION;
    }
    if controls.brake {
        speed -= ACCELERATION;
    }
    if controls.steer_left {
        rotation -= STEER_SPEED;
    }
    if controls.steer_right {
        rotation += STEER_SPEED;
    }

    speed *= FRICTION;
    if speed > MAX_SPEED {
        speed = MAX_SPEED;
    }
    if speed < -MAX_SPEED / 2.0 {
        speed = -MAX_SPEED / 2.0;
    }
    if speed.abs() < STOP_THRESHOLD {
        speed = 0.0;
    }

    let rad = rotation.to_radians();
    let mut x = state.x + rad.cos() * speed;
    let mut y = state.y + rad.sin() * speed;

    // Toroidal world: leaving one edge re-enters at the opposite edge,
    // independently per axis.
    if x < 0.0 {
        x = WIDTH;
    }
    if x > WIDTH {
        x = 0.0;
    }
    if y < 0.0 {
        y = HEIGHT;
    }
    if y > HEIGHT {
        y = 0.0;
    }

    Kinematics {
        x,
        y,
        rotation,
        speed,
    }
}

/// One participant, networked or local.
///
/// `color` and `name` are display-only and never change after creation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerState {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub speed: f64,
    pub color: String,
    pub name: String,
}

impl PlayerState {
    pub fn new(id: String, x: f64, y: f64, color: String, name: String) -> Self {
        Self {
            id,
            x,
            y,
            rotation: 0.0,
            speed: 0.0,
            color,
            name,
        }
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            x: self.x,
            y: self.y,
            rotation: self.rotation,
            speed: self.speed,
        }
    }

    /// Shallow-merges the present fields of a partial update.
    pub fn apply_update(&mut self, update: &StateUpdate) {
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation;
        }
        if let Some(speed) = update.speed {
            self.speed = speed;
        }
    }
}

/// Partial kinematic update carried by the wire protocol.
///
/// The field set is closed: anything else in the payload fails to parse.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct StateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl StateUpdate {
    /// Full-state update carrying every kinematic field.
    pub fn from_kinematics(k: &Kinematics) -> Self {
        Self {
            x: Some(k.x),
            y: Some(k.y),
            rotation: Some(k.rotation),
            speed: Some(k.speed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.rotation.is_none() && self.speed.is_none()
    }

    /// Rejects values no legitimate simulation can produce: non-finite
    /// numbers, positions outside the world, speeds outside the clamp range.
    /// Heading is unbounded by design and only has to be finite.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(x) = self.x {
            if !x.is_finite() || !(0.0..=WIDTH).contains(&x) {
                return Err(format!("x out of range: {}", x));
            }
        }
        if let Some(y) = self.y {
            if !y.is_finite() || !(0.0..=HEIGHT).contains(&y) {
                return Err(format!("y out of range: {}", y));
            }
        }
        if let Some(rotation) = self.rotation {
            if !rotation.is_finite() {
                return Err(format!("rotation not finite: {}", rotation));
            }
        }
        if let Some(speed) = self.speed {
            if !speed.is_finite() || !(-MAX_SPEED / 2.0..=MAX_SPEED).contains(&speed) {
                return Err(format!("speed out of range: {}", speed));
            }
        }
        Ok(())
    }
}
