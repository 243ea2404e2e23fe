// Frame timing
pub const MAX_FRAME_DELTA: f32 = 0.05; // bound the integrator across frame hitches
pub const FPS_SMOOTHING: f32 = 0.1;

// Car tuning
pub const BASE_TURN_SPEED: f32 = 160.0; // degrees per second
pub const MAX_SPEED: f32 = 400.0;
pub const ACCEL_RATE: f32 = 600.0;
pub const BRAKE_POWER: f32 = 800.0;
pub const ROAD_FRICTION: f32 = 400.0;
pub const OFFROAD_FRICTION: f32 = 600.0;
pub const REVERSE_MAX: f32 = -200.0;
pub const REVERSE_ACCEL_FACTOR: f32 = 0.6;
pub const FULL_TURN_SPEED: f32 = 80.0; // speed at which steering reaches full authority
pub const OFFROAD_SPEED_FACTOR: f32 = 0.5;
pub const CAR_LENGTH: f32 = 40.0;
pub const CAR_WIDTH: f32 = 18.0;

// Drift and boost
pub const DRIFT_MIN_SPEED: f32 = 210.0;
pub const DRIFT_TURN_MULTIPLIER: f32 = 1.5;
pub const DRIFT_SPEED_FACTOR: f32 = 0.7;
pub const DRIFT_CHARGE_STAGE_1: f32 = 0.2;
pub const DRIFT_CHARGE_STAGE_2: f32 = 0.4;
pub const DRIFT_CHARGE_STAGE_3: f32 = 0.7;
pub const BOOST_FORCE: f32 = 700.0;
pub const BOOSTED_MAX_SPEED: f32 = 550.0;
pub const BOOST_DURATION: f32 = 0.6;

// Track generation
pub const SEGMENT_COUNT_BASE: usize = 9;
pub const SEGMENT_COUNT_SPREAD: f32 = 12.0;
pub const TRACK_BASE_RADIUS: f32 = 600.0;
pub const TRACK_RADIUS_VARIATION: f32 = 960.0; // 160% of the base radius
pub const TRACK_ANGLE_JITTER: f32 = 0.2; // fraction of one angular slot
pub const TRACK_BASE_HALF_WIDTH: f32 = 50.0;
pub const TRACK_HALF_WIDTH_VARIATION: f32 = 25.0;
pub const START_LINE_OFFSET: f32 = 30.0;
pub const CHECKPOINT_INTERVAL: usize = 4;

// Boundary bands, outward from the track edge
pub const WALL_THICKNESS: f32 = 250.0;
pub const GRASS_THICKNESS: f32 = WALL_THICKNESS - 20.0;
pub const DIRT_THICKNESS: f32 = 20.0;
pub const ASPHALT_MAX_WIDTH: f32 = 125.0;

// Camera tuning
pub const CAMERA_SMOOTH_FACTOR: f32 = 2.0; // higher = snappier, lower = smoother
pub const CAMERA_BASE_ZOOM: f32 = 1.0;
pub const CAMERA_ZOOM_FACTOR: f32 = 0.0001;
pub const CAMERA_MIN_ZOOM: f32 = 0.8;
pub const CAMERA_MAX_ZOOM: f32 = 1.2;
pub const CAMERA_LOOKAHEAD_FACTOR: f32 = 0.25;
