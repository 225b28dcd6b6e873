//! Player controller: velocity integration, jump curve and motion state.
//!
//! One call to [`Player::update`] is one simulation tick. The order of the
//! steps is fixed: acceleration, gravity, jump curve, drag, clamping,
//! pixel-snapped move, collision resolution, then flag derivation.

use ledge_common::{snap_to_pixel, Aabb, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::input::Input;
use crate::physics::{self, Resolution};

/// How the motion state is chosen from the player's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPriority {
    /// Chosen while reading input, before physics, from last tick's flags:
    /// idle without input, then jumping, falling, running. Falling is only
    /// reachable while moving sideways without jump held.
    Source,
    /// Chosen after physics: jumping while jump is held, then falling when
    /// airborne and moving down, then running, then idle.
    #[default]
    Corrected,
}

/// Presentation state derived from the player's flags each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MotionState {
    /// Standing still
    #[default]
    Idle,
    /// Horizontal input held
    Running,
    /// Jump input held
    Jumping,
    /// Airborne and moving down
    Falling,
}

impl MotionState {
    /// Animation clip name for this state.
    #[must_use]
    pub const fn clip_name(self) -> &'static str {
        match self {
            MotionState::Idle => "idle",
            MotionState::Running => "run",
            MotionState::Jumping => "jump",
            MotionState::Falling => "fall",
        }
    }
}

/// Direction the sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Sprite as drawn
    #[default]
    Right,
    /// Sprite mirrored horizontally
    Left,
}

/// Movement tuning and collision box size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPhysics {
    /// Horizontal acceleration from input (px/s²)
    pub move_acceleration: f32,
    /// Horizontal speed cap (px/s)
    pub max_move_speed: f32,
    /// Downward acceleration (px/s²)
    pub gravity_acceleration: f32,
    /// Vertical speed cap in both directions (px/s)
    pub max_fall_speed: f32,
    /// Vertical velocity at the start of a jump (negative is up)
    pub jump_launch_velocity: f32,
    /// Longest time jump can be held to gain height (s)
    pub max_jump_time: f32,
    /// Exponent shaping how quickly the jump loses power
    pub jump_control_power: f32,
    /// Per-tick horizontal velocity multiplier on the ground
    pub ground_drag_factor: f32,
    /// Per-tick horizontal velocity multiplier in the air
    pub air_drag_factor: f32,
    /// Collision box width (px)
    pub collision_width: f32,
    /// Collision box height (px)
    pub collision_height: f32,
    /// Motion state selection rule
    pub animation_priority: AnimationPriority,
}

impl Default for PlayerPhysics {
    fn default() -> Self {
        Self {
            move_acceleration: 10_000.0,
            max_move_speed: 1_750.0,
            gravity_acceleration: 3_400.0,
            max_fall_speed: 550.0,
            jump_launch_velocity: -1_200.0,
            max_jump_time: 0.35,
            jump_control_power: 0.14,
            ground_drag_factor: 0.58,
            air_drag_factor: 0.65,
            // Does not match the 120x80 sprite frames; tune per entity.
            collision_width: 32.0,
            collision_height: 40.0,
            animation_priority: AnimationPriority::default(),
        }
    }
}

impl PlayerPhysics {
    /// Creates the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default tuning with a different collision box.
    #[must_use]
    pub fn with_collision_size(width: f32, height: f32) -> Self {
        Self {
            collision_width: width,
            collision_height: height,
            ..Self::default()
        }
    }

    /// Collision box size.
    #[must_use]
    pub fn collision_size(&self) -> Vec2 {
        Vec2::new(self.collision_width, self.collision_height)
    }

    /// Vertical velocity after holding jump for `jump_time` seconds.
    ///
    /// Starts near the launch velocity and eases to zero at
    /// `max_jump_time`, so releasing early gives a lower jump.
    #[must_use]
    pub fn jump_curve(&self, jump_time: f32) -> f32 {
        let progress = jump_time / self.max_jump_time;
        self.jump_launch_velocity * (1.0 - progress.powf(self.jump_control_power))
    }
}

/// The player entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    position: Vec2,
    velocity: Vec2,
    /// Horizontal intent for this tick
    movement: f32,
    is_jumping: bool,
    was_jumping: bool,
    is_on_ground: bool,
    is_falling: bool,
    jump_time: f32,
    facing: Facing,
    motion_state: MotionState,
    physics: PlayerPhysics,
}

impl Player {
    /// Creates a player at rest at the spawn position.
    #[must_use]
    pub fn new(spawn: Vec2, physics: PlayerPhysics) -> Self {
        Self {
            position: spawn,
            velocity: Vec2::ZERO,
            movement: 0.0,
            is_jumping: false,
            was_jumping: false,
            is_on_ground: false,
            is_falling: false,
            jump_time: 0.0,
            facing: Facing::default(),
            motion_state: MotionState::Idle,
            physics,
        }
    }

    /// Top-left position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Tuning in use.
    #[must_use]
    pub fn physics(&self) -> &PlayerPhysics {
        &self.physics
    }

    /// Whether downward motion was stopped last tick.
    #[must_use]
    pub fn is_on_ground(&self) -> bool {
        self.is_on_ground
    }

    /// Marks the player as standing on something, e.g. at spawn.
    pub fn set_on_ground(&mut self, on_ground: bool) {
        self.is_on_ground = on_ground;
    }

    /// Whether the player is airborne and moving down.
    #[must_use]
    pub fn is_falling(&self) -> bool {
        self.is_falling
    }

    /// Whether jump is held this tick.
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    /// Seconds jump has been powering the current jump.
    #[must_use]
    pub fn jump_time(&self) -> f32 {
        self.jump_time
    }

    /// Direction the sprite faces.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Current presentation state.
    #[must_use]
    pub fn motion_state(&self) -> MotionState {
        self.motion_state
    }

    /// Collision box at the current position.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_origin(self.position, self.physics.collision_size())
    }

    /// Runs one tick: input, physics, collision and state derivation.
    pub fn update<I>(&mut self, input: &Input, obstacles: I, dt: f32) -> Resolution
    where
        I: IntoIterator<Item = Aabb>,
    {
        self.apply_input(input);
        let resolution = self.apply_physics(obstacles, dt);
        if self.physics.animation_priority == AnimationPriority::Corrected {
            self.motion_state = self.corrected_state();
        }
        resolution
    }

    /// Reads horizontal and jump intent and updates facing.
    pub fn apply_input(&mut self, input: &Input) {
        self.movement = input.movement;
        self.is_jumping = input.jump;

        if self.movement < 0.0 {
            self.facing = Facing::Left;
        } else if self.movement > 0.0 {
            self.facing = Facing::Right;
        }

        if self.physics.animation_priority == AnimationPriority::Source {
            self.motion_state = self.source_state();
        }
    }

    /// Integrates velocity, moves, and resolves collisions.
    pub fn apply_physics<I>(&mut self, obstacles: I, dt: f32) -> Resolution
    where
        I: IntoIterator<Item = Aabb>,
    {
        let previous = self.position;
        let p = &self.physics;

        self.velocity.x += self.movement * p.move_acceleration * dt;
        self.velocity.y = (self.velocity.y + p.gravity_acceleration * dt)
            .clamp(-p.max_fall_speed, p.max_fall_speed);

        // The launch curve starts steeper than the fall limit.
        let max_fall = self.physics.max_fall_speed;
        self.velocity.y = self
            .jump_velocity(self.velocity.y, dt)
            .clamp(-max_fall, max_fall);

        let p = &self.physics;
        self.velocity.x *= if self.is_on_ground {
            p.ground_drag_factor
        } else {
            p.air_drag_factor
        };
        self.velocity.x = self.velocity.x.clamp(-p.max_move_speed, p.max_move_speed);

        self.position = snap_to_pixel(self.position + self.velocity * dt);

        let was_on_ground = self.is_on_ground;
        let resolution = physics::resolve(self.bounding_box(), self.velocity, obstacles);
        self.position = resolution.position;
        self.is_on_ground = resolution.grounded;

        if self.position.x == previous.x {
            self.velocity.x = 0.0;
        }
        if self.position.y == previous.y {
            self.velocity.y = 0.0;
        }

        self.is_falling = !self.is_on_ground && self.velocity.y > 0.0;

        if self.is_on_ground && !was_on_ground {
            debug!("Player landed at ({}, {})", self.position.x, self.position.y);
        }
        trace!(
            "tick dt={dt} pos=({}, {}) vel=({}, {}) ground={} jump_time={}",
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.is_on_ground,
            self.jump_time
        );

        resolution
    }

    /// Applies the jump curve to a vertical velocity.
    ///
    /// A jump starts on the tick jump goes down while grounded and keeps
    /// powering up while held, until `max_jump_time` has passed.
    pub fn jump_velocity(&mut self, velocity_y: f32, dt: f32) -> f32 {
        let mut velocity_y = velocity_y;

        if self.is_jumping {
            if (!self.was_jumping && self.is_on_ground) || self.jump_time > 0.0 {
                self.jump_time += dt;
            }

            if 0.0 < self.jump_time && self.jump_time <= self.physics.max_jump_time {
                velocity_y = self.physics.jump_curve(self.jump_time);
            } else {
                self.jump_time = 0.0;
            }
        } else {
            self.jump_time = 0.0;
        }

        self.was_jumping = self.is_jumping;
        velocity_y
    }

    fn source_state(&self) -> MotionState {
        if self.movement == 0.0 && !self.is_jumping {
            MotionState::Idle
        } else if self.is_jumping {
            MotionState::Jumping
        } else if self.is_falling {
            MotionState::Falling
        } else {
            MotionState::Running
        }
    }

    fn corrected_state(&self) -> MotionState {
        if self.is_jumping {
            MotionState::Jumping
        } else if self.is_falling {
            MotionState::Falling
        } else if self.movement != 0.0 {
            MotionState::Running
        } else {
            MotionState::Idle
        }
    }
}
