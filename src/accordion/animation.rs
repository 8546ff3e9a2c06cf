use std::time::Duration;

/// Height of a collapsible region over time.
///
/// Replaces "measure, snap to 0, force reflow, animate to measured" with an
/// explicit state machine advanced by a frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Collapsed,
    Expanding { from: f64, to: f64, elapsed: Duration },
    /// `auto` means the height follows the content instead of a fixed pixel value
    Expanded { height: f64, auto: bool },
    Collapsing { from: f64, elapsed: Duration },
}

/// Reported when a transition runs to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEnd {
    pub epoch: u64,
    pub opened: bool,
}

/// One animated height with its transition settings
#[derive(Debug, Clone, PartialEq)]
pub struct HeightAnimation {
    motion: Motion,
    duration: Duration,
    threshold: f64,
    epoch: u64,
}

impl HeightAnimation {
    pub fn new(duration: Duration, threshold: f64) -> Self {
        Self {
            motion: Motion::Collapsed,
            duration,
            threshold,
            epoch: 0,
        }
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Identifies the current transition; bumped every time one starts
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the region is open or opening
    pub fn is_open(&self) -> bool {
        matches!(self.motion, Motion::Expanding { .. } | Motion::Expanded { .. })
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.motion,
            Motion::Expanding { .. } | Motion::Collapsing { .. }
        )
    }

    /// Rendered height right now
    pub fn height(&self) -> f64 {
        match self.motion {
            Motion::Collapsed => 0.0,
            Motion::Expanding { from, to, elapsed } => lerp(from, to, self.progress(elapsed)),
            Motion::Expanded { height, .. } => height,
            Motion::Collapsing { from, elapsed } => lerp(from, 0.0, self.progress(elapsed)),
        }
    }

    /// Animate open to `natural`, starting from the height rendered now.
    /// Heights under the threshold snap open.
    pub fn expand(&mut self, natural: f64) {
        self.epoch += 1;
        let from = self.height();
        self.motion = if natural < self.threshold || self.duration.is_zero() {
            Motion::Expanded {
                height: natural.max(0.0),
                auto: false,
            }
        } else {
            Motion::Expanding {
                from,
                to: natural,
                elapsed: Duration::ZERO,
            }
        };
    }

    /// Animate from the current rendered height to 0. Near-empty regions snap shut.
    pub fn collapse(&mut self) {
        self.collapse_from(self.height());
    }

    /// Collapse starting from an explicitly measured height. Used when the
    /// region is at `auto` and its rendered height is the content height.
    pub fn collapse_from(&mut self, measured: f64) {
        self.epoch += 1;
        self.motion = if measured < self.threshold || self.duration.is_zero() {
            Motion::Collapsed
        } else {
            Motion::Collapsing {
                from: measured,
                elapsed: Duration::ZERO,
            }
        };
    }

    /// Retarget an open region without animating
    pub fn snap_open(&mut self, natural: f64, auto: bool) {
        self.epoch += 1;
        self.motion = Motion::Expanded {
            height: natural.max(0.0),
            auto,
        };
    }

    /// Close without animating
    pub fn snap_closed(&mut self) {
        self.epoch += 1;
        self.motion = Motion::Collapsed;
    }

    /// Advance by one frame. Returns the completion, if the transition ended on this frame.
    pub fn tick(&mut self, dt: Duration) -> Option<TransitionEnd> {
        match self.motion {
            Motion::Expanding { from, to, elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.duration {
                    self.motion = Motion::Expanded {
                        height: to,
                        auto: false,
                    };
                    Some(TransitionEnd {
                        epoch: self.epoch,
                        opened: true,
                    })
                } else {
                    self.motion = Motion::Expanding { from, to, elapsed };
                    None
                }
            }
            Motion::Collapsing { from, elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.duration {
                    self.motion = Motion::Collapsed;
                    Some(TransitionEnd {
                        epoch: self.epoch,
                        opened: false,
                    })
                } else {
                    self.motion = Motion::Collapsing { from, elapsed };
                    None
                }
            }
            Motion::Collapsed | Motion::Expanded { .. } => None,
        }
    }

    /// Release a completed opening to `auto` height.
    ///
    /// Ignored unless `end` belongs to the current transition and the region
    /// is still open at a fixed height.
    pub fn relax(&mut self, end: TransitionEnd) -> bool {
        if end.epoch != self.epoch || !end.opened {
            ::log::trace!(
                "Ignoring stale transition end (epoch {} vs {})",
                end.epoch,
                self.epoch
            );
            return false;
        }
        match self.motion {
            Motion::Expanded {
                height,
                auto: false,
            } => {
                self.motion = Motion::Expanded { height, auto: true };
                true
            }
            _ => false,
        }
    }

    fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        // smoothstep
        t * t * (3.0 - 2.0 * t)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn anim() -> HeightAnimation {
        HeightAnimation::new(Duration::from_millis(300), 5.0)
    }

    fn run_to_end(a: &mut HeightAnimation) -> Option<TransitionEnd> {
        for _ in 0..100 {
            if let Some(end) = a.tick(FRAME) {
                return Some(end);
            }
        }
        None
    }

    #[test]
    fn test_expand_animates_from_zero() {
        let mut a = anim();
        a.expand(200.0);
        assert_eq!(a.height(), 0.0);
        assert!(a.is_animating());

        a.tick(Duration::from_millis(150));
        let mid = a.height();
        assert!(mid > 0.0 && mid < 200.0, "mid-height was {mid}");

        let end = run_to_end(&mut a).unwrap();
        assert!(end.opened);
        assert_eq!(a.motion(), Motion::Expanded { height: 200.0, auto: false });
        assert!(a.relax(end));
        assert_eq!(a.motion(), Motion::Expanded { height: 200.0, auto: true });
    }

    #[test]
    fn test_height_is_monotonic_while_expanding() {
        let mut a = anim();
        a.expand(120.0);
        let mut last = a.height();
        while a.tick(FRAME).is_none() {
            assert!(a.height() >= last);
            last = a.height();
        }
    }

    #[test]
    fn test_below_threshold_snaps() {
        let mut a = anim();
        a.expand(3.0);
        assert!(!a.is_animating());
        assert!(a.is_open());

        a.collapse();
        assert_eq!(a.motion(), Motion::Collapsed);
    }

    #[test]
    fn test_interrupted_opening_collapses_from_current_height() {
        let mut a = anim();
        a.expand(200.0);
        a.tick(Duration::from_millis(150));
        let at = a.height();

        a.collapse();
        assert_eq!(a.height(), at);
        assert!(!a.is_open());
        let end = run_to_end(&mut a).unwrap();
        assert!(!end.opened);
        assert_eq!(a.height(), 0.0);
    }

    #[test]
    fn test_reopening_mid_collapse_grows_from_current_height() {
        let mut a = anim();
        a.expand(200.0);
        run_to_end(&mut a);
        a.collapse();
        a.tick(Duration::from_millis(150));
        let at = a.height();
        assert!(at > 0.0 && at < 200.0, "mid-height was {at}");

        a.expand(200.0);
        assert_eq!(a.height(), at);
        assert!(a.is_open());
        let end = run_to_end(&mut a).unwrap();
        assert!(end.opened);
        assert_eq!(a.height(), 200.0);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut a = anim();
        a.expand(100.0);
        let end = run_to_end(&mut a).unwrap();

        // Closed and reopened before the completion was handled
        a.collapse();
        a.expand(100.0);
        run_to_end(&mut a);
        assert!(!a.relax(end));
        assert_eq!(a.motion(), Motion::Expanded { height: 100.0, auto: false });
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut a = HeightAnimation::new(Duration::ZERO, 5.0);
        a.expand(80.0);
        assert_eq!(a.height(), 80.0);
        a.collapse();
        assert_eq!(a.height(), 0.0);
    }
}
