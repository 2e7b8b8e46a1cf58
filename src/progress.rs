use serde::Serialize;

use crate::decode::GameState;
use crate::ram;

/// Value of the player state register (0x000E).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    LeftmostOfScreen,
    ClimbingVine,
    EnteringReversedPipe,
    DescendingPipe,
    /// 0x04 and 0x05 both auto-walk.
    AutoWalk(u8),
    Dead,
    EnteringArea,
    Normal,
    CannotMove,
    Dying,
    PaletteCycling,
    Other(u8),
}

impl PlayerState {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => PlayerState::LeftmostOfScreen,
            0x01 => PlayerState::ClimbingVine,
            0x02 => PlayerState::EnteringReversedPipe,
            0x03 => PlayerState::DescendingPipe,
            0x04 | 0x05 => PlayerState::AutoWalk(byte),
            0x06 => PlayerState::Dead,
            0x07 => PlayerState::EnteringArea,
            0x08 => PlayerState::Normal,
            0x09 => PlayerState::CannotMove,
            0x0B => PlayerState::Dying,
            0x0C => PlayerState::PaletteCycling,
            other => PlayerState::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            PlayerState::LeftmostOfScreen => 0x00,
            PlayerState::ClimbingVine => 0x01,
            PlayerState::EnteringReversedPipe => 0x02,
            PlayerState::DescendingPipe => 0x03,
            PlayerState::AutoWalk(byte) => byte,
            PlayerState::Dead => 0x06,
            PlayerState::EnteringArea => 0x07,
            PlayerState::Normal => 0x08,
            PlayerState::CannotMove => 0x09,
            PlayerState::Dying => 0x0B,
            PlayerState::PaletteCycling => 0x0C,
            PlayerState::Other(byte) => byte,
        }
    }

    /// The player cannot act: scripted movement or a transition.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            PlayerState::LeftmostOfScreen
                | PlayerState::ClimbingVine
                | PlayerState::EnteringReversedPipe
                | PlayerState::DescendingPipe
                | PlayerState::AutoWalk(_)
                | PlayerState::EnteringArea
        )
    }
}

/// Power-up status from 0x0756. Anything other than 0 or 1 is fireball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Small,
    Tall,
    Fireball,
}

impl Status {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Status::Small,
            1 => Status::Tall,
            _ => Status::Fireball,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Small => "small",
            Status::Tall => "tall",
            Status::Fireball => "fireball",
        }
    }
}

impl GameState {
    /// Distance from the bottom of the screen. Above the viewport the
    /// pixel register has wrapped, so count up past 255 instead.
    pub fn y_position(&self) -> i32 {
        let inverted = 255 - self.y_pixel as i32;
        if self.y_viewport < 1 {
            255 + inverted
        } else {
            inverted
        }
    }

    pub fn is_busy(&self) -> bool {
        self.player_state.is_busy()
    }

    pub fn is_dying(&self) -> bool {
        self.player_state == PlayerState::Dying || self.y_viewport > 1
    }

    pub fn is_dead(&self) -> bool {
        self.player_state == PlayerState::Dead
    }

    pub fn is_game_over(&self) -> bool {
        self.life == ram::LIVES_GAME_OVER
    }

    pub fn is_world_over(&self) -> bool {
        self.gameplay_mode == ram::GAMEPLAY_END_OF_WORLD
    }

    /// Float state 3 also means climbing a vine, so it only counts when a
    /// Bowser or flagpole object is loaded.
    pub fn is_stage_over(&self) -> bool {
        let sentinel_loaded = self
            .enemy_types
            .iter()
            .any(|t| ram::STAGE_OVER_ENEMIES.contains(t));
        sentinel_loaded && self.float_state == ram::FLOAT_STATE_FLAG_OR_VINE
    }

    pub fn flag_get(&self) -> bool {
        self.is_world_over() || self.is_stage_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VINE: u8 = 0x2F;

    #[test]
    fn y_position_inside_viewport() {
        let state = GameState {
            y_viewport: 1,
            y_pixel: 200,
            ..Default::default()
        };
        assert_eq!(state.y_position(), 55);
    }

    #[test]
    fn y_position_above_viewport_wraps() {
        let state = GameState {
            y_viewport: 0,
            y_pixel: 200,
            ..Default::default()
        };
        assert_eq!(state.y_position(), 310);
    }

    #[test]
    fn vine_does_not_end_the_stage() {
        let state = GameState {
            enemy_types: [VINE, 0, 0, 0, 0],
            float_state: 3,
            ..Default::default()
        };
        assert!(!state.is_stage_over());
        assert!(!state.flag_get());
    }

    #[test]
    fn flagpole_with_float_state_ends_the_stage() {
        let state = GameState {
            enemy_types: [0, 0, ram::ENEMY_FLAGPOLE, 0, 0],
            float_state: 3,
            ..Default::default()
        };
        assert!(state.is_stage_over());
        assert!(state.flag_get());

        let sliding = GameState {
            float_state: 0,
            ..state
        };
        assert!(!sliding.is_stage_over());
    }

    #[test]
    fn bowser_with_float_state_ends_the_stage() {
        let state = GameState {
            enemy_types: [0, 0, 0, 0, ram::ENEMY_BOWSER],
            float_state: 3,
            ..Default::default()
        };
        assert!(state.is_stage_over());
        assert!(state.flag_get());

        let fighting = GameState {
            float_state: 1,
            ..state
        };
        assert!(!fighting.is_stage_over());
        assert!(!fighting.flag_get());
    }

    #[test]
    fn end_of_world_counts_as_flag() {
        let state = GameState {
            gameplay_mode: 2,
            ..Default::default()
        };
        assert!(state.is_world_over());
        assert!(state.flag_get());
    }

    #[test]
    fn busy_states_match_the_register_domain() {
        let busy: Vec<u8> = (0u8..=0x0C)
            .filter(|&b| PlayerState::from_byte(b).is_busy())
            .collect();
        assert_eq!(busy, vec![0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x07]);
        for b in 0u8..=0xFF {
            assert_eq!(PlayerState::from_byte(b).to_byte(), b);
        }
    }

    #[test]
    fn dying_and_dead() {
        let dying = GameState {
            player_state: PlayerState::Dying,
            y_viewport: 1,
            ..Default::default()
        };
        assert!(dying.is_dying());

        let falling = GameState {
            player_state: PlayerState::Normal,
            y_viewport: 3,
            ..Default::default()
        };
        assert!(falling.is_dying());

        let dead = GameState {
            player_state: PlayerState::from_byte(0x06),
            y_viewport: 1,
            ..Default::default()
        };
        assert!(dead.is_dead());
        assert!(!dead.is_dying());
    }

    #[test]
    fn game_over_sentinel() {
        let state = GameState {
            life: 0xFF,
            ..Default::default()
        };
        assert!(state.is_game_over());
        assert!(!GameState::default().is_game_over());
    }

    #[test]
    fn unmapped_status_is_fireball() {
        assert_eq!(Status::from_byte(0), Status::Small);
        assert_eq!(Status::from_byte(1), Status::Tall);
        assert_eq!(Status::from_byte(2), Status::Fireball);
        assert_eq!(Status::from_byte(0x7F), Status::Fireball);
    }
}
