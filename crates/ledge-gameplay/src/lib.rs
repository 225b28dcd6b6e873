//! # Ledge Gameplay
//!
//! Gameplay systems for the Ledge platformer.
//!
//! This crate owns everything that happens inside one simulation tick:
//! - Input polling and key bindings
//! - Player controller with acceleration, drag and a variable-height jump
//! - Minimum-translation collision resolution against static boxes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod input;
pub mod physics;
pub mod player;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::input::*;
    pub use crate::physics::*;
    pub use crate::player::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use ledge_common::{Aabb, Vec2};

    #[test]
    fn test_input_drives_player() {
        let mut manager = InputManager::new();
        let mut player = Player::new(Vec2::new(100.0, 100.0), PlayerPhysics::default());
        player.set_on_ground(true);
        let floor = Aabb::new(0.0, 140.0, 400.0, 32.0);

        manager.poll(&[KeyCode::Left]);
        player.update(&manager.process(), [floor], 1.0 / 60.0);
        manager.end_frame();

        assert!(player.position().x < 100.0);
        assert_eq!(player.facing(), Facing::Left);
        assert_eq!(player.motion_state(), MotionState::Running);
    }

    #[test]
    fn test_jump_key_launches_player() {
        let mut manager = InputManager::new();
        let mut player = Player::new(Vec2::new(100.0, 100.0), PlayerPhysics::default());
        player.set_on_ground(true);
        let floor = Aabb::new(0.0, 140.0, 400.0, 32.0);

        manager.poll(&[KeyCode::Space]);
        let resolution = player.update(&manager.process(), [floor], 1.0 / 60.0);

        assert_eq!(resolution.contacts, 0);
        assert!(player.velocity().y < 0.0);
        assert_eq!(player.motion_state(), MotionState::Jumping);
    }
}
