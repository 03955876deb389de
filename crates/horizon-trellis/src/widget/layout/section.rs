//! Space distribution across the sections (rows or columns) of one axis.

use std::cmp::Ordering;

use horizon_trellis_render::Pixel;

/// Maximum size used for sections without an explicit or preferred cap.
pub(crate) const UNBOUNDED: Pixel = 32768;

/// Sizing constraints of one row or column for a single distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SectionInfo {
    pub index: usize,
    pub min_size: Pixel,
    pub max_size: Pixel,
    /// Always >= 1.
    pub stretch: u32,
    pub has_greedy_non_spacer: bool,
    pub has_greedy_spacer: bool,
}

impl SectionInfo {
    pub fn new(index: usize, stretch: u32) -> Self {
        Self {
            index,
            min_size: 0,
            max_size: 0,
            stretch: stretch.max(1),
            has_greedy_non_spacer: false,
            has_greedy_spacer: false,
        }
    }

    fn tier(&self) -> usize {
        if self.has_greedy_non_spacer {
            0
        } else if self.has_greedy_spacer {
            1
        } else {
            2
        }
    }

    fn max_per_stretch(&self) -> i64 {
        i64::from(self.max_size) / i64::from(self.stretch)
    }

    /// Priority order: greedy content, then greedy spacers, then larger
    /// minimums, then tighter caps per unit of stretch.
    fn priority(&self, other: &Self) -> Ordering {
        other
            .has_greedy_non_spacer
            .cmp(&self.has_greedy_non_spacer)
            .then_with(|| other.has_greedy_spacer.cmp(&self.has_greedy_spacer))
            .then_with(|| other.min_size.cmp(&self.min_size))
            .then_with(|| self.max_per_stretch().cmp(&other.max_per_stretch()))
    }
}

/// Distribute `space` (margins already removed) over `sections`.
///
/// Returns one size per section, indexed like the input. Sections are
/// visited in priority order and each takes its minimum plus its stretch
/// share of the space still unclaimed within its tier, clamped to its
/// maximum. Sections with a zero maximum hold no items; they get zero and
/// take neither stretch nor spacing.
pub(crate) fn distribute(sections: &[SectionInfo], mut space: Pixel, spacing: Pixel) -> Vec<Pixel> {
    let mut sizes = vec![0; sections.len()];

    let mut stretch_remaining = [0u64; 3];
    let mut min_remaining: Pixel = 0;
    let mut occupied: Pixel = 0;
    for section in sections {
        min_remaining += section.min_size;
        if section.max_size > 0 {
            stretch_remaining[section.tier()] += u64::from(section.stretch);
            occupied += 1;
        }
    }

    let mut spacing_remaining = if occupied > 0 { spacing * (occupied - 1) } else { 0 };

    let mut sorted = sections.to_vec();
    sorted.sort_by(SectionInfo::priority);

    for section in &sorted {
        let tier = section.tier();
        let min = section.min_size;
        let max = section.max_size;
        let mut size = min;

        if min < max {
            let excess = f64::from(space - min_remaining - spacing_remaining);
            size += (excess * f64::from(section.stretch) / stretch_remaining[tier] as f64) as Pixel;
            if size < min {
                size = min;
            } else if size > max {
                size = max;
            }
        }

        sizes[section.index] = size;

        min_remaining -= min;

        if max > 0 {
            stretch_remaining[tier] -= u64::from(section.stretch);
            space -= size + spacing;
            spacing_remaining -= spacing;
        }
    }

    sizes
}
