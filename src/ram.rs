// =============================================================================
// RAM Addresses (Super Mario Bros. / Lost Levels, NTSC)
// =============================================================================
//
// Every address the environment reads or writes lives here.

pub const RAM_SIZE: usize = 0x0800;

// Counters stored one decimal digit per byte, most significant first
pub const SCORE_DIGITS: [u16; 6] = [0x07DE, 0x07DF, 0x07E0, 0x07E1, 0x07E2, 0x07E3];
pub const TIME_DIGITS: [u16; 3] = [0x07F8, 0x07F9, 0x07FA];
pub const COIN_DIGITS: [u16; 2] = [0x07ED, 0x07EE];

pub const LIVES: u16 = 0x075A;
pub const WORLD: u16 = 0x075F;
pub const STAGE: u16 = 0x075C;
pub const AREA: u16 = 0x0760;

pub const PLAYER_PAGE: u16 = 0x006D;
pub const PLAYER_X: u16 = 0x0086;
pub const SCREEN_LEFT_X: u16 = 0x071C;
pub const PLAYER_Y_PIXEL: u16 = 0x03B8;
// 0 = above, 1 = visible, >1 = below (falling into a pit)
pub const PLAYER_Y_VIEWPORT: u16 = 0x00B5;
pub const PLAYER_STATE: u16 = 0x000E;
pub const PLAYER_STATUS: u16 = 0x0756;
pub const FLOAT_STATE: u16 = 0x001D;

// 0 = demo, 1 = standard, 2 = end of world
pub const GAMEPLAY_MODE: u16 = 0x0770;
pub const PRELEVEL_TIMER: u16 = 0x07A0;
pub const CHANGE_AREA_TIMER: u16 = 0x06DE;

// Type bytes scanned for stage-completion sentinels
pub const ENEMY_TYPE: [u16; 5] = [0x0016, 0x0017, 0x0018, 0x0019, 0x001A];

// Drawn enemy slots; a slot is active when its flag byte is non-zero
pub const ENEMY_ACTIVE: [u16; 4] = [0x000F, 0x0010, 0x0011, 0x0012];
pub const ENEMY_PAGE: [u16; 4] = [0x006E, 0x006F, 0x0070, 0x0071];
pub const ENEMY_X: [u16; 4] = [0x0087, 0x0088, 0x0089, 0x008A];
pub const ENEMY_Y: [u16; 4] = [0x00CF, 0x00D0, 0x00D1, 0x00D2];

// Background collision buffer: 2 pages of 13 rows x 16 columns
pub const TILES: u16 = 0x0500;
pub const TILE_PAGE_ROWS: u16 = 13;
pub const TILE_PAGE_COLUMNS: u16 = 16;

pub const ENEMY_BOWSER: u8 = 0x2D;
pub const ENEMY_FLAGPOLE: u8 = 0x31;
pub const STAGE_OVER_ENEMIES: [u8; 2] = [ENEMY_BOWSER, ENEMY_FLAGPOLE];

pub const GAMEPLAY_END_OF_WORLD: u8 = 2;
pub const FLOAT_STATE_FLAG_OR_VINE: u8 = 3;
pub const LIVES_GAME_OVER: u8 = 0xFF;
