use super::NavKey;

/// Presenter view: manual navigation over the script, never plays audio.
#[derive(Debug, Default)]
pub struct Teleprompter {
    index: usize,
    /// Index the script list last scrolled to.
    scrolled: Option<usize>,
}

impl Teleprompter {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn on_key(&mut self, key: NavKey, len: usize) {
        match key {
            NavKey::Down | NavKey::Right | NavKey::Space => {
                if self.index + 1 < len {
                    self.index += 1;
                }
            }
            NavKey::Up | NavKey::Left => self.index = self.index.saturating_sub(1),
        }
    }

    /// Clicking a script block activates it.
    pub fn activate(&mut self, index: usize, len: usize) {
        if index < len {
            self.index = index;
        }
    }

    /// True once per index change: the script list should bring the active
    /// block into view.
    pub fn take_scroll_request(&mut self) -> bool {
        if self.scrolled == Some(self.index) {
            return false;
        }
        self.scrolled = Some(self.index);
        true
    }

    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_navigation_is_clamped() {
        let mut t = Teleprompter::default();
        t.on_key(NavKey::Up, 3);
        assert_eq!(t.index(), 0);
        for key in [NavKey::Down, NavKey::Right, NavKey::Space, NavKey::Down] {
            t.on_key(key, 3);
        }
        assert_eq!(t.index(), 2);
        t.on_key(NavKey::Left, 3);
        assert_eq!(t.index(), 1);
    }

    #[test]
    fn test_click_activates_block() {
        let mut t = Teleprompter::default();
        t.activate(4, 5);
        assert_eq!(t.index(), 4);
        t.activate(9, 5);
        assert_eq!(t.index(), 4);
    }

    #[test]
    fn test_scroll_requested_once_per_change() {
        let mut t = Teleprompter::default();
        assert!(t.take_scroll_request());
        assert!(!t.take_scroll_request());
        t.on_key(NavKey::Down, 3);
        assert!(t.take_scroll_request());
        assert!(!t.take_scroll_request());
    }
}
