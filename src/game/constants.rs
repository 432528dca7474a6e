pub const MIN_SNAKE_LENGTH: usize = 5;
pub const SPAWN_COLUMN: usize = 2;
pub const OUTBOUND_QUEUE_CAPACITY: usize = 8;
pub const STALLED_TICK_LIMIT: u32 = 50;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ROWS: usize = 30;
pub const DEFAULT_COLS: usize = 35;
pub const DEFAULT_TICK_MS: u64 = 200;
pub const DEFAULT_FOOD_PERIOD_MS: u64 = 8000;

pub const COLOR_POOL: [&str; 7] = ["red", "yellow", "green", "blue", "magenta", "cyan", "white"];
