use std::time::{Duration, Instant};

/// Per-frame delta time, time since start and a smoothed fps readout.
pub struct FrameClock
{
  start: Instant,
  last_frame: Instant,
  delta: f32,
  smoothed_fps: f32,
  smoothing: f32,
}

impl FrameClock
{
  pub fn new() -> Self
  {
    Self::starting_at(Instant::now())
  }

  pub fn starting_at(start: Instant) -> Self
  {
    Self {
      start,
      last_frame: start,
      delta: 0.0,
      smoothed_fps: 60.0,
      smoothing: 0.05, // 5% new sample, 95% history
    }
  }

  /// Advance to now; returns the seconds since the previous tick.
  pub fn tick(&mut self) -> f32
  {
    self.tick_at(Instant::now())
  }

  pub fn tick_at(&mut self, now: Instant) -> f32
  {
    // saturating: a `now` older than the last frame counts as zero time
    let elapsed = now.saturating_duration_since(self.last_frame);
    self.last_frame = self.last_frame.max(now);
    self.delta = elapsed.as_secs_f32();

    if self.delta > 0.0
    {
      let instant_fps = 1.0 / self.delta;
      self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing) + instant_fps * self.smoothing;
    }

    self.delta
  }

  pub fn delta(&self) -> f32
  {
    self.delta
  }

  /// Seconds between construction and the latest tick; drives animation.
  pub fn elapsed(&self) -> f32
  {
    self.elapsed_duration().as_secs_f32()
  }

  pub fn elapsed_duration(&self) -> Duration
  {
    self.last_frame.duration_since(self.start)
  }

  pub fn fps(&self) -> f32
  {
    self.smoothed_fps
  }
}

impl Default for FrameClock
{
  fn default() -> Self
  {
    Self::new()
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn tick_reports_delta_and_elapsed()
  {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start);

    let dt = clock.tick_at(start + Duration::from_millis(20));
    assert!((dt - 0.020).abs() < 1e-6);

    clock.tick_at(start + Duration::from_millis(50));
    assert!((clock.delta() - 0.030).abs() < 1e-6);
    assert!((clock.elapsed() - 0.050).abs() < 1e-6);
  }

  #[test]
  fn delta_is_never_negative()
  {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start + Duration::from_millis(100));

    assert_eq!(clock.tick_at(start), 0.0);
    assert_eq!(clock.elapsed(), 0.0);
  }

  #[test]
  fn fps_converges_towards_frame_rate()
  {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start);

    for frame in 1..=400u64
    {
      clock.tick_at(start + Duration::from_millis(frame * 10));
    }

    assert!((clock.fps() - 100.0).abs() < 1.0, "fps = {}", clock.fps());
  }
}
