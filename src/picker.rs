// Picking-mode state machine and the commit decision.
// Visual: while active, the magnifier follows the mouse; a click on the
// canvas freezes the current color as the selection and leaves picking mode.

use crate::types::Rect;
use tracing::debug;

/// Session state for one picking interaction. The cached color is the only
/// value that outlives a tick; it survives deactivation until overwritten.
pub struct PickerSession {
    active: bool,
    current: String, // most recent center-cell color
}

impl Default for PickerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PickerSession {
    pub fn new() -> Self {
        Self { active: false, current: String::from("#FFFFFF") }
    }

    /// The shell consults this every frame; the engine must not run a tick
    /// while it is false, so deactivation stops sampling immediately.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        if !self.active {
            debug!("picking mode on");
        }
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        if self.active {
            debug!("picking mode off");
        }
        self.active = false;
    }

    pub fn toggle(&mut self) {
        if self.active {
            self.deactivate();
        } else {
            self.activate();
        }
    }

    /// Cache the color computed by the latest tick.
    pub fn set_current(&mut self, color: String) {
        self.current = color;
    }

    /// The live pick candidate (hex string of the center cell).
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Commit decision for a click at window coordinates (x, y).
    ///
    /// Inside the canvas rect (edges inclusive): returns the cached color —
    /// the value current at the moment of the click, never re-sampled — and
    /// ends picking mode. Outside the rect, or while inactive: no commit,
    /// and an active session stays active. The caller must treat a Some
    /// return as consuming the click.
    pub fn try_commit(&mut self, x: i32, y: i32, bounds: &Rect) -> Option<String> {
        if !self.active {
            return None;
        }
        if !bounds.contains(x, y) {
            return None;
        }
        self.active = false;
        debug!(color = %self.current, "pick committed");
        Some(self.current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect { x: 10, y: 10, width: 100, height: 100 };

    fn active_session(color: &str) -> PickerSession {
        let mut s = PickerSession::new();
        s.activate();
        s.set_current(color.to_string());
        s
    }

    #[test]
    fn test_commit_inside_bounds_ends_picking() {
        let mut s = active_session("#1A2B3C");
        let got = s.try_commit(50, 50, &BOUNDS);
        assert_eq!(got.as_deref(), Some("#1A2B3C"));
        assert!(!s.is_active());
    }

    #[test]
    fn test_commit_on_edge_counts() {
        // [0,width] x [0,height] is inclusive on both ends.
        let mut s = active_session("#ABCDEF");
        assert!(s.try_commit(110, 110, &BOUNDS).is_some());
        let mut s = active_session("#ABCDEF");
        assert!(s.try_commit(10, 10, &BOUNDS).is_some());
    }

    #[test]
    fn test_commit_outside_bounds_is_ignored() {
        let mut s = active_session("#FF0000");
        assert_eq!(s.try_commit(111, 50, &BOUNDS), None);
        assert!(s.is_active(), "a miss must leave picking mode on");
        assert_eq!(s.current(), "#FF0000");
    }

    #[test]
    fn test_commit_while_inactive_is_ignored() {
        let mut s = PickerSession::new();
        s.set_current("#00FF00".to_string());
        assert_eq!(s.try_commit(50, 50, &BOUNDS), None);
        assert!(!s.is_active());
    }

    #[test]
    fn test_commit_delivers_color_at_click_time() {
        // The committed value is whatever was cached when the click landed,
        // even if a later tick would have produced something else.
        let mut s = active_session("#101010");
        s.set_current("#202020".to_string());
        assert_eq!(s.try_commit(50, 50, &BOUNDS).as_deref(), Some("#202020"));
    }

    #[test]
    fn test_current_survives_deactivation() {
        let mut s = active_session("#123456");
        s.deactivate();
        assert_eq!(s.current(), "#123456");
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut s = PickerSession::new();
        s.toggle();
        assert!(s.is_active());
        s.toggle();
        assert!(!s.is_active());
    }
}
