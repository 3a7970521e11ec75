// Game loop timing and control
//
// Fixed timestep updates with variable-rate rendering: physics and game
// logic advance at a constant rate while frames are drawn as fast as the
// display allows.

use std::time::{Duration, Instant};

/// Target update rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of fixed updates per frame to prevent spiral of death
const MAX_UPDATES_PER_FRAME: u32 = 5;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Fixed-timestep accumulator driving the engine's tick/render cycle
pub struct GameLoop {
    /// Accumulated time not yet consumed by fixed updates
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Time when the loop started
    start_time: Instant,

    /// Whether updates are paused
    paused: bool,

    /// Total frames rendered
    frame_count: u64,

    /// Total fixed updates executed
    update_count: u64,

    /// Frame timing history for the windowed FPS average
    frame_times: Vec<Duration>,

    /// Frames rendered since the last FPS log line
    frames_this_second: u32,

    /// Start of the current FPS logging window
    second_start: Instant,

    /// FPS averaged over the frame time window (updated periodically)
    current_fps: f32,

    /// Whether to log the FPS once per second
    log_fps: bool,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: now,
            start_time: now,
            paused: false,
            frame_count: 0,
            update_count: 0,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frames_this_second: 0,
            second_start: now,
            current_fps: 0.0,
            log_fps: false,
        }
    }

    /// Enable or disable the once-per-second FPS log line
    pub fn set_log_fps(&mut self, enabled: bool) {
        self.log_fps = enabled;
    }

    /// Begin a new frame, returning the number of fixed updates to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;
        self.frames_this_second += 1;

        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }
        self.update_fps();

        if now.duration_since(self.second_start) >= Duration::from_secs(1) {
            if self.log_fps {
                log::info!("Frames per second: {}", self.frames_this_second);
            }
            self.frames_this_second = 0;
            self.second_start = now;
        }

        // Paused frames render but do not accumulate update time
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_UPDATES_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        // A frame longer than the catch-up budget drops the remainder rather
        // than replaying it over the following frames
        if updates == MAX_UPDATES_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }

        self.update_count += updates as u64;
        updates
    }

    /// The fixed timestep for updates, in seconds
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Interpolation alpha between the last two fixed updates
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// FPS averaged over the last `FPS_WINDOW_SIZE` frames
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }

    /// Total elapsed time since the loop started
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }

    /// Total number of frames rendered
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total number of fixed updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Check if updates are paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause fixed updates (rendering continues)
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game loop paused");
        }
    }

    /// Resume fixed updates, dropping time accumulated while paused
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Game loop resumed");
        }
    }

    /// Toggle the pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_fixed_timestep() {
        let game_loop = GameLoop::new();
        assert!((game_loop.fixed_timestep() - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_pause_resume() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        assert!(game_loop.is_paused());
        game_loop.resume();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());
        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_paused_no_updates() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();

        thread::sleep(Duration::from_millis(50));

        let updates = game_loop.begin_frame();
        assert_eq!(updates, 0);
    }

    #[test]
    fn test_frame_counting() {
        let mut game_loop = GameLoop::new();
        game_loop.begin_frame();
        game_loop.begin_frame();
        assert_eq!(game_loop.frame_count(), 2);
    }

    #[test]
    fn test_update_accumulation() {
        let mut game_loop = GameLoop::new();

        thread::sleep(FIXED_TIMESTEP_DURATION);

        let updates = game_loop.begin_frame();
        assert!(updates >= 1);
        assert!(updates <= MAX_UPDATES_PER_FRAME);
        assert_eq!(game_loop.update_count(), updates as u64);
    }

    #[test]
    fn test_max_updates_per_frame_limit() {
        let mut game_loop = GameLoop::new();

        // A 300ms frame would allow 18 updates without the cap
        thread::sleep(Duration::from_millis(300));

        let updates = game_loop.begin_frame();
        assert_eq!(updates, MAX_UPDATES_PER_FRAME);
        // Excess time is dropped, not replayed
        assert_eq!(game_loop.alpha(), 0.0);
    }

    #[test]
    fn test_fps_averages_over_frame_window() {
        let mut game_loop = GameLoop::new();

        // Well under a second of wall time; the windowed average must
        // already reflect the ~10ms frame pacing
        for _ in 0..10 {
            thread::sleep(Duration::from_millis(10));
            game_loop.begin_frame();
        }

        let fps = game_loop.fps();
        assert!(fps > 0.0);
        // 10ms frames are 100 FPS; sleep overshoot only lowers the average
        assert!(fps <= 110.0, "fps {} out of range", fps);
        assert!(fps >= 5.0, "fps {} out of range", fps);
    }

    #[test]
    fn test_fps_window_drops_old_frames() {
        let mut game_loop = GameLoop::new();
        for _ in 0..FPS_WINDOW_SIZE {
            game_loop.begin_frame();
        }
        assert_eq!(game_loop.frame_times.len(), FPS_WINDOW_SIZE);

        game_loop.begin_frame();
        assert_eq!(game_loop.frame_times.len(), FPS_WINDOW_SIZE);
    }

    #[test]
    fn test_alpha_range() {
        let mut game_loop = GameLoop::new();
        thread::sleep(Duration::from_millis(5));
        game_loop.begin_frame();
        let alpha = game_loop.alpha();
        assert!((0.0..=1.0).contains(&alpha));
    }

    #[test]
    fn test_resume_drops_accumulated_time() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        thread::sleep(Duration::from_millis(50));
        game_loop.resume();

        let updates = game_loop.begin_frame();
        // The 50ms spent paused must not burst into catch-up updates
        assert!(updates <= 1);
    }

    #[test]
    fn test_elapsed_time() {
        let game_loop = GameLoop::new();
        thread::sleep(Duration::from_millis(10));
        assert!(game_loop.elapsed() >= Duration::from_millis(10));
    }
}
