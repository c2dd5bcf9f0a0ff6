/// Edge detector for the "scrolled to the end of the list" signal.
///
/// Only a false→true transition fires; staying at the end does not.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollTrigger {
    at_end: bool,
}

impl ScrollTrigger {
    /// Feed the current signal. Returns `true` on a rising edge.
    pub fn observe(&mut self, reached: bool) -> bool {
        let fired = reached && !self.at_end;
        self.at_end = reached;
        fired
    }

    /// Re-arm after a query change.
    pub fn reset(&mut self) {
        self.at_end = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_rising_edge_only() {
        let mut trigger = ScrollTrigger::default();
        assert!(!trigger.observe(false));
        assert!(trigger.observe(true));
        assert!(!trigger.observe(true));
        assert!(!trigger.observe(false));
        assert!(trigger.observe(true));
    }

    #[test]
    fn reset_rearms() {
        let mut trigger = ScrollTrigger::default();
        assert!(trigger.observe(true));
        trigger.reset();
        assert!(trigger.observe(true));
    }
}
