use crate::layout::Span;

/// A pinned span normalized against the scrollable extent
///
/// Always satisfies `0 <= start < center < end <= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedRange {
    start: f64,
    end: f64,
    center: f64,
}

impl PinnedRange {
    /// `None` unless `0 <= start < end <= 1`
    pub fn new(start: f64, end: f64) -> Option<Self> {
        (0.0 <= start && start < end && end <= 1.0).then(|| Self {
            start,
            end,
            center: (start + end) / 2.0,
        })
    }

    /// Normalize a document span; `None` when nothing scrolls or the span is degenerate
    pub fn from_span(span: &Span, max_scroll: f64) -> Option<Self> {
        if max_scroll <= 0.0 {
            return None;
        }
        let start = (span.start / max_scroll).clamp(0.0, 1.0);
        let end = (span.end / max_scroll).clamp(0.0, 1.0);
        Self::new(start, end)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn within_tolerance(&self, fraction: f64, tolerance: f64) -> bool {
        fraction >= self.start - tolerance && fraction <= self.end + tolerance
    }
}

/// Maps a gesture-end scroll fraction to the fraction to settle at
///
/// Pure over its ranges: the same input always yields the same target.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapRule {
    ranges: Vec<PinnedRange>,
    tolerance: f64,
}

impl SnapRule {
    /// Rule over `ranges` (sorted by start); `None` when there is nothing to snap to
    pub fn new(mut ranges: Vec<PinnedRange>, tolerance: f64) -> Option<Self> {
        if ranges.is_empty() {
            return None;
        }
        ranges.sort_by(|a, b| a.start.total_cmp(&b.start));
        Some(Self {
            ranges,
            tolerance: tolerance.max(0.0),
        })
    }

    pub fn from_spans(spans: impl IntoIterator<Item = Span>, max_scroll: f64, tolerance: f64) -> Option<Self> {
        let ranges = spans
            .into_iter()
            .filter_map(|span| PinnedRange::from_span(&span, max_scroll))
            .collect();
        Self::new(ranges, tolerance)
    }

    pub fn ranges(&self) -> &[PinnedRange] {
        &self.ranges
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Center of the nearest range when `fraction` is inside any tolerance
    /// window, otherwise `fraction` itself. Equidistant centers resolve to
    /// the earlier range.
    pub fn snap(&self, fraction: f64) -> f64 {
        if !self
            .ranges
            .iter()
            .any(|r| r.within_tolerance(fraction, self.tolerance))
        {
            return fraction;
        }

        let mut nearest = self.ranges[0];
        for range in &self.ranges[1..] {
            if (range.center - fraction).abs() < (nearest.center - fraction).abs() {
                nearest = *range;
            }
        }
        nearest.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> SnapRule {
        SnapRule::new(
            vec![
                PinnedRange::new(0.09, 0.15).unwrap(),
                PinnedRange::new(0.425, 0.485).unwrap(),
                PinnedRange::new(0.75, 0.81).unwrap(),
            ],
            0.02,
        )
        .unwrap()
    }

    #[test]
    fn test_snaps_to_nearest_center_inside_window() {
        let rule = rule();
        assert_eq!(rule.snap(0.50), rule.ranges()[1].center());
        assert_eq!(rule.snap(0.10), rule.ranges()[0].center());
        assert_eq!(rule.snap(0.82), rule.ranges()[2].center());
        assert!((rule.snap(0.50) - 0.455).abs() < 1e-12);
    }

    #[test]
    fn test_identity_outside_windows() {
        let rule = rule();
        assert_eq!(rule.snap(0.40), 0.40);
        assert_eq!(rule.snap(0.0), 0.0);
        assert_eq!(rule.snap(0.62), 0.62);
        assert_eq!(rule.snap(1.0), 1.0);
    }

    #[test]
    fn test_idempotent() {
        let rule = rule();
        for i in 0..=100 {
            let fraction = i as f64 / 100.0;
            assert_eq!(rule.snap(fraction), rule.snap(fraction));
        }
    }

    #[test]
    fn test_tie_goes_to_first_range() {
        // Adjacent ranges with the input exactly between their centers
        let ranges = vec![
            PinnedRange::new(0.5, 0.75).unwrap(),
            PinnedRange::new(0.25, 0.5).unwrap(),
        ];
        let rule = SnapRule::new(ranges, 0.02).unwrap();
        assert_eq!(rule.snap(0.5), 0.375);
    }

    #[test]
    fn test_from_spans() {
        assert!(SnapRule::from_spans([Span::new(0.0, 100.0)], 0.0, 0.02).is_none());
        assert!(SnapRule::from_spans(Vec::<Span>::new(), 500.0, 0.02).is_none());

        let rule = SnapRule::from_spans([Span::new(300.0, 400.0), Span::new(0.0, 100.0)], 500.0, 0.02).unwrap();
        assert_eq!(rule.ranges()[0].start(), 0.0);
        assert!((rule.ranges()[1].center() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_range_rejects_empty_or_inverted_bounds() {
        assert!(PinnedRange::new(0.4, 0.4).is_none());
        assert!(PinnedRange::new(0.6, 0.4).is_none());
        assert!(PinnedRange::new(-0.1, 0.4).is_none());
        assert!(PinnedRange::new(0.2, 1.5).is_none());
        assert!(PinnedRange::new(0.2, f64::NAN).is_none());

        let range = PinnedRange::new(0.2, 0.4).unwrap();
        assert!(range.start() < range.center() && range.center() < range.end());
        assert!(PinnedRange::from_span(&Span::new(100.0, 100.0), 500.0).is_none());
    }
}
