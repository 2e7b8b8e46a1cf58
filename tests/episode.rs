use smb_rl::{
    EmulatorCore, EnvConfig, EnvError, MarioEnv, RomVariant, Status, Target, Tile, buttons, ram,
};

const FLAG_X: i32 = 300;

/// A one-screen stand-in for the game: start begins play with 400 on the
/// clock, RIGHT walks two pixels a frame, DOWN drops the player into a pit
/// and reaching `FLAG_X` grabs the flag.
#[derive(Clone)]
struct ToyCore {
    ram: Vec<u8>,
    tick: u32,
    running: bool,
    ignores_start: bool,
}

impl ToyCore {
    fn new() -> Self {
        Self {
            ram: vec![0; ram::RAM_SIZE],
            tick: 0,
            running: false,
            ignores_start: false,
        }
    }

    fn set_time(&mut self, value: u32) {
        let digits = [value / 100 % 10, value / 10 % 10, value % 10];
        for (&addr, d) in ram::TIME_DIGITS.iter().zip(digits) {
            self.ram[addr as usize] = d as u8;
        }
    }

    fn time(&self) -> u32 {
        ram::TIME_DIGITS
            .iter()
            .fold(0, |acc, &a| acc * 10 + self.ram[a as usize] as u32)
    }

    fn x(&self) -> i32 {
        self.ram[ram::PLAYER_PAGE as usize] as i32 * 0x100 + self.ram[ram::PLAYER_X as usize] as i32
    }

    fn set_x(&mut self, x: i32) {
        self.ram[ram::PLAYER_PAGE as usize] = (x / 0x100) as u8;
        self.ram[ram::PLAYER_X as usize] = (x % 0x100) as u8;
    }

    fn begin(&mut self) {
        self.running = true;
        self.set_time(400);
        self.set_x(40);
        self.ram[ram::LIVES as usize] = 2;
        self.ram[ram::PLAYER_STATE as usize] = 0x08;
        self.ram[ram::PLAYER_Y_VIEWPORT as usize] = 1;
        self.ram[ram::PLAYER_Y_PIXEL as usize] = 176;
    }
}

impl EmulatorCore for ToyCore {
    type Snapshot = ToyCore;

    fn peek(&self, addr: u16) -> u8 {
        self.ram[addr as usize % ram::RAM_SIZE]
    }

    fn poke(&mut self, addr: u16, val: u8) {
        self.ram[addr as usize % ram::RAM_SIZE] = val;
    }

    fn advance_frame(&mut self, held: u8) -> anyhow::Result<()> {
        if !self.running {
            if held & buttons::START != 0 && !self.ignores_start {
                self.begin();
            }
            return Ok(());
        }
        self.tick += 1;
        if self.tick % 24 == 0 {
            let t = self.time();
            self.set_time(t.saturating_sub(1));
        }
        if held & buttons::RIGHT != 0 {
            let x = self.x() + 2;
            self.set_x(x);
            if x >= FLAG_X {
                self.ram[ram::ENEMY_TYPE[0] as usize] = ram::ENEMY_FLAGPOLE;
                self.ram[ram::FLOAT_STATE as usize] = 3;
            }
        }
        if held & buttons::DOWN != 0 {
            self.ram[ram::PLAYER_Y_VIEWPORT as usize] = 2;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.ram.fill(0);
        self.tick = 0;
        self.running = false;
    }

    fn snapshot(&self) -> ToyCore {
        self.clone()
    }

    fn restore(&mut self, snapshot: &ToyCore) {
        *self = snapshot.clone();
    }
}

fn single_stage() -> EnvConfig {
    EnvConfig {
        target: Some(Target::new(1, 1, 1).unwrap()),
        ..Default::default()
    }
}

#[test]
fn reset_is_required_before_the_first_step() {
    let mut env = MarioEnv::new(ToyCore::new(), single_stage()).unwrap();
    assert!(matches!(env.step(buttons::RIGHT), Err(EnvError::NeedsReset)));

    let obs = env.reset().unwrap();
    assert_eq!(obs.x_pos, 40);
    assert_eq!(obs.time, 399);
    assert_eq!((obs.world, obs.stage), (1, 1));
    assert_eq!(obs.status, Status::Small);
    assert_eq!(obs.reward, 0);
    assert!(!obs.flag_get);
}

#[test]
fn walking_right_reaches_the_flag() {
    let mut env = MarioEnv::new(ToyCore::new(), single_stage()).unwrap();
    env.reset().unwrap();

    let mut steps = 0;
    let last = loop {
        let result = env.step(buttons::RIGHT).unwrap();
        steps += 1;
        if result.done {
            break result;
        }
        assert_eq!(result.raw_reward, 5);
        assert_eq!(result.reward, 5.0);
        assert!(steps < 1_000);
    };

    assert_eq!(steps, (FLAG_X - 40) / 2);
    assert!(last.observation.flag_get);
    assert_eq!(last.breakdown.flag, 1_000_000);
    assert_eq!(last.raw_reward, 1_000_005);
    assert_eq!(last.observation.reward, 1_000_005);
    assert_eq!(last.reward, 15.0);

    assert!(matches!(env.step(buttons::RIGHT), Err(EnvError::NeedsReset)));

    let again = env.reset().unwrap();
    assert_eq!(again.x_pos, 40);
    assert!(!again.flag_get);
}

#[test]
fn falling_into_a_pit_ends_the_stage() {
    let mut env = MarioEnv::new(ToyCore::new(), single_stage()).unwrap();
    env.reset().unwrap();

    let idle = env.step(buttons::NOOP).unwrap();
    assert_eq!(idle.raw_reward, -10 + 5);
    assert!(!idle.done);

    let fall = env.step(buttons::DOWN).unwrap();
    assert!(fall.done);
    assert_eq!(fall.breakdown.death, -5_000);
    assert_eq!(fall.reward, -15.0);
}

#[test]
fn observations_serialize_with_fixed_keys() {
    let mut env = MarioEnv::new(ToyCore::new(), single_stage()).unwrap();
    let obs = env.reset().unwrap();
    let value = serde_json::to_value(&obs).unwrap();

    let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        [
            "coins", "enemy", "flag_get", "life", "reward", "score", "stage", "status", "time",
            "world", "x_pos", "y_pos",
        ]
    );
    assert_eq!(value["status"], "small");

    let grid = value["enemy"].as_array().unwrap();
    assert_eq!(grid.len(), 12);
    assert!(grid.iter().all(|row| row.as_array().unwrap().len() == 15));

    assert_eq!(obs.enemy.cells().filter(|&t| t == Tile::Player).count(), 1);
    assert_eq!(obs.to_features().len(), smb_rl::STATE_DIM);
}

#[test]
fn rejected_configuration_never_touches_the_core() {
    let config = EnvConfig {
        max_skip_frames: 0,
        ..Default::default()
    };
    let err = MarioEnv::new(ToyCore::new(), config).err().unwrap();
    assert!(matches!(err, EnvError::Configuration(_)));

    assert!(matches!(Target::new(9, 1, 1), Err(EnvError::Configuration(_))));
}

#[test]
fn start_screen_that_never_clears_is_reported() {
    let mut core = ToyCore::new();
    core.ignores_start = true;
    let config = EnvConfig {
        max_skip_frames: 100,
        ..single_stage()
    };
    let err = MarioEnv::new(core, config).err().unwrap();
    assert!(matches!(
        err,
        EnvError::StuckState {
            phase: "start screen",
            ..
        }
    ));
}

#[test]
fn lost_levels_late_world_is_refused_at_construction() {
    let config = EnvConfig {
        rom_variant: RomVariant::LostLevels,
        target: Some(Target::new(5, 1, 1).unwrap()),
        ..Default::default()
    };
    let err = MarioEnv::new(ToyCore::new(), config).err().unwrap();
    assert!(matches!(err, EnvError::Configuration(_)));
}
