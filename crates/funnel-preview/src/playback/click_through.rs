use super::NavKey;

/// Manual paging over the flattened timeline.
#[derive(Debug, Default)]
pub struct ClickThrough {
    index: usize,
}

impl ClickThrough {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn go_next(&mut self, len: usize) {
        if self.index + 1 < len {
            self.index += 1;
        }
    }

    pub fn go_prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn go_to(&mut self, index: usize, len: usize) {
        if index < len {
            self.index = index;
        }
    }

    pub fn on_key(&mut self, key: NavKey, len: usize) {
        match key {
            NavKey::Right | NavKey::Space => self.go_next(len),
            NavKey::Left => self.go_prev(),
            NavKey::Up | NavKey::Down => {}
        }
    }

    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prev_at_start_is_noop() {
        let mut nav = ClickThrough::default();
        nav.go_prev();
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_next_at_end_is_noop() {
        let mut nav = ClickThrough::default();
        nav.go_next(3);
        nav.go_next(3);
        assert_eq!(nav.index(), 2);
        nav.go_next(3);
        assert_eq!(nav.index(), 2);
    }

    #[test]
    fn test_keys() {
        let mut nav = ClickThrough::default();
        nav.on_key(NavKey::Space, 4);
        nav.on_key(NavKey::Right, 4);
        assert_eq!(nav.index(), 2);
        nav.on_key(NavKey::Left, 4);
        assert_eq!(nav.index(), 1);
        nav.on_key(NavKey::Down, 4);
        assert_eq!(nav.index(), 1);
    }

    #[test]
    fn test_empty_timeline_stays_at_zero() {
        let mut nav = ClickThrough::default();
        nav.go_next(0);
        nav.clamp(0);
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut nav = ClickThrough::default();
        nav.go_to(5, 6);
        nav.clamp(3);
        assert_eq!(nav.index(), 2);
    }
}
