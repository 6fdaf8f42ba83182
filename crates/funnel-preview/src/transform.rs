/// Server-side AI rewrite styles. All three share one request contract and
/// differ only in endpoint and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStyle {
    Impact,
    Master,
    MattsStyle,
}

impl TransformStyle {
    pub const ALL: [TransformStyle; 3] = [Self::Impact, Self::Master, Self::MattsStyle];

    /// Path segment under `/api/admin/funnels/presentations/:id/`.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Impact => "format-for-impact",
            Self::Master => "master-layout-energy",
            Self::MattsStyle => "matts-style",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Impact => "Impact",
            Self::Master => "Master",
            Self::MattsStyle => "Matt's Style",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Impact => "Tighten headlines and split long copy into punchy statements.",
            Self::Master => "Rebalance layouts and energy across the deck.",
            Self::MattsStyle => "Rewrite slides in Matt's conversational teaching voice.",
        }
    }
}

/// How many slides an AI rewrite may touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlideLimit {
    Five,
    #[default]
    Ten,
    Twenty,
    All,
}

impl SlideLimit {
    pub const ALL: [SlideLimit; 4] = [Self::Five, Self::Ten, Self::Twenty, Self::All];

    /// `None` means no limit; the request omits the field.
    pub fn count(self) -> Option<u32> {
        match self {
            Self::Five => Some(5),
            Self::Ten => Some(10),
            Self::Twenty => Some(20),
            Self::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Five => "5 slides",
            Self::Ten => "10 slides",
            Self::Twenty => "20 slides",
            Self::All => "All slides",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRequest {
    pub style: TransformStyle,
    pub limit: SlideLimit,
}

/// Confirm-then-run gate shared by the three rewrite actions. At most one
/// rewrite is in flight; while it runs every trigger is disabled.
#[derive(Debug, Default)]
pub struct TransformGate {
    pub limit: SlideLimit,
    pending: Option<TransformStyle>,
    running: Option<TransformStyle>,
}

impl TransformGate {
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn running(&self) -> Option<TransformStyle> {
        self.running
    }

    pub fn pending(&self) -> Option<TransformStyle> {
        self.pending
    }

    /// Ask for confirmation. Ignored while a rewrite is running.
    pub fn request(&mut self, style: TransformStyle) -> bool {
        if self.is_running() {
            return false;
        }
        self.pending = Some(style);
        true
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Confirm the pending request and mark it running.
    pub fn confirm(&mut self) -> Option<TransformRequest> {
        if self.is_running() {
            return None;
        }
        let style = self.pending.take()?;
        self.running = Some(style);
        Some(TransformRequest {
            style,
            limit: self.limit,
        })
    }

    pub fn finish(&mut self) {
        self.running = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_distinct() {
        let endpoints: Vec<_> = TransformStyle::ALL.iter().map(|s| s.endpoint()).collect();
        assert_eq!(
            endpoints,
            ["format-for-impact", "master-layout-energy", "matts-style"]
        );
    }

    #[test]
    fn test_limit_counts() {
        assert_eq!(SlideLimit::Five.count(), Some(5));
        assert_eq!(SlideLimit::All.count(), None);
    }

    #[test]
    fn test_gate_requires_confirmation() {
        let mut gate = TransformGate::default();
        assert_eq!(gate.confirm(), None);
        assert!(gate.request(TransformStyle::Master));
        gate.limit = SlideLimit::Twenty;
        let req = gate.confirm().unwrap();
        assert_eq!(req.style, TransformStyle::Master);
        assert_eq!(req.limit, SlideLimit::Twenty);
        assert!(gate.is_running());
    }

    #[test]
    fn test_gate_serializes_rewrites() {
        let mut gate = TransformGate::default();
        gate.request(TransformStyle::Impact);
        gate.confirm();
        assert!(!gate.request(TransformStyle::MattsStyle));
        assert_eq!(gate.pending(), None);
        gate.finish();
        assert!(gate.request(TransformStyle::MattsStyle));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut gate = TransformGate::default();
        gate.request(TransformStyle::Impact);
        gate.cancel();
        assert_eq!(gate.confirm(), None);
        assert!(!gate.is_running());
    }
}
