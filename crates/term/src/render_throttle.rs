//! Frame pacing for the terminal loop.
//!
//! While tiles are falling every frame is drawn. Once the board is settled a
//! frame is drawn when the board fingerprint changes, and otherwise at most
//! once per interval.

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_static_interval_ms: u64,
    last: Option<(u64, u64)>,
}

impl RenderThrottle {
    pub fn new(min_static_interval_ms: u64) -> Self {
        Self {
            min_static_interval_ms,
            last: None,
        }
    }

    /// Decide whether to draw at `now_ms` and record the draw if so.
    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64, animating: bool) -> bool {
        let render = match self.last {
            None => true,
            Some(_) if animating => true,
            Some((_, fp)) if fp != fingerprint => true,
            Some((at, _)) => now_ms.saturating_sub(at) >= self.min_static_interval_ms,
        };
        if render {
            self.last = Some((now_ms, fingerprint));
        }
        render
    }

    /// Forget the last frame so the next call draws.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_frames_are_throttled() {
        let mut t = RenderThrottle::new(250);
        assert!(t.should_render(0, 1, false));
        assert!(!t.should_render(100, 1, false));
        assert!(t.should_render(100, 2, false));
        assert!(!t.should_render(200, 2, false));
        assert!(t.should_render(350, 2, false));
    }

    #[test]
    fn test_animating_always_renders() {
        let mut t = RenderThrottle::new(1000);
        assert!(t.should_render(0, 1, true));
        assert!(t.should_render(1, 1, true));
        t.reset();
        assert!(t.should_render(2, 1, false));
    }
}
