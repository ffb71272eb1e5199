//! The combined selection value type.
//!
//! One immutable tagged value represents "no selection", selected rows,
//! selected columns, or a rectangular cell range. All operations return a new
//! value instead of mutating in place, so concurrent readers (the render
//! pipeline) never observe a partially updated selection.
//!
//! Shape invariants are enforced at construction and re-established after
//! every mutation:
//! - `Cells` carries exactly two ranges: the anchor and focus corners.
//! - `Rows`/`Columns` carry one-or-more sorted, disjoint, non-adjacent
//!   inclusive intervals (touching input ranges are merged).

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::types::{CellCoord, IndexRange};

/// Which flavor of selection the value holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionKind {
    #[default]
    None,
    Rows,
    Columns,
    Cells,
}

/// The single selection value shared by controllers and the render pipeline.
///
/// For `Rows`/`Columns`, `ranges` holds inclusive `[start, end]` index
/// intervals. For `Cells`, `ranges` holds exactly two `[column, row]`
/// coordinates: anchor then focus (either corner order; use
/// [`Self::serialize`] for the min/max-normalized form).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedSelection {
    pub kind: SelectionKind,
    pub ranges: Vec<IndexRange>,
}

/// Merge overlapping or adjacent inclusive intervals into a sorted disjoint
/// list. `[2, 4]` and `[5, 7]` touch, so they merge into `[2, 7]`.
fn merge_ranges(mut ranges: Vec<IndexRange>) -> Vec<IndexRange> {
    for range in &mut ranges {
        if range[0] > range[1] {
            range.swap(0, 1);
        }
    }
    ranges.sort_unstable();
    let mut merged: Vec<IndexRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        if let Some(last) = merged.last_mut() {
            if range[0] <= last[1].saturating_add(1) {
                last[1] = last[1].max(range[1]);
                continue;
            }
        }
        merged.push(range);
    }
    merged
}

impl CombinedSelection {
    /// The empty selection.
    pub fn none() -> Self {
        Self::default()
    }

    /// A rectangular cell selection from anchor to focus corner.
    pub fn cells(anchor: CellCoord, focus: CellCoord) -> Self {
        Self {
            kind: SelectionKind::Cells,
            ranges: vec![anchor, focus],
        }
    }

    /// A row selection. Rejects an empty range list; merges touching ranges.
    pub fn rows(ranges: Vec<IndexRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(GridError::Selection(
                "row selection requires at least one range".to_string(),
            ));
        }
        Ok(Self {
            kind: SelectionKind::Rows,
            ranges: merge_ranges(ranges),
        })
    }

    /// A column selection. Rejects an empty range list; merges touching ranges.
    pub fn columns(ranges: Vec<IndexRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(GridError::Selection(
                "column selection requires at least one range".to_string(),
            ));
        }
        Ok(Self {
            kind: SelectionKind::Columns,
            ranges: merge_ranges(ranges),
        })
    }

    pub fn is_none(&self) -> bool {
        self.kind == SelectionKind::None
    }

    pub fn is_cells(&self) -> bool {
        self.kind == SelectionKind::Cells
    }

    /// Anchor corner of a cell selection.
    pub fn anchor(&self) -> Option<CellCoord> {
        if self.kind == SelectionKind::Cells {
            self.ranges.first().copied()
        } else {
            None
        }
    }

    /// Focus corner of a cell selection.
    pub fn focus(&self) -> Option<CellCoord> {
        if self.kind == SelectionKind::Cells {
            self.ranges.get(1).copied()
        } else {
            None
        }
    }

    /// Normalized `[min_col, min_row, max_col, max_row]` of a cell selection.
    pub fn cell_bounds(&self) -> Option<[usize; 4]> {
        let anchor = self.anchor()?;
        let focus = self.focus()?;
        Some([
            anchor[0].min(focus[0]),
            anchor[1].min(focus[1]),
            anchor[0].max(focus[0]),
            anchor[1].max(focus[1]),
        ])
    }

    /// Grow the active range: for `Cells` the focus corner moves to `range`
    /// (interpreted as a cell coordinate); for `Rows`/`Columns` the new range
    /// is merged with any it overlaps or touches. Expanding `None` yields a
    /// fresh single-range selection of the given kind.
    pub fn expand(&self, range: IndexRange, kind: SelectionKind) -> Self {
        match (self.kind, kind) {
            (SelectionKind::Cells, SelectionKind::Cells) => {
                let anchor = self.anchor().unwrap_or(range);
                Self::cells(anchor, range)
            }
            (SelectionKind::Rows, SelectionKind::Rows)
            | (SelectionKind::Columns, SelectionKind::Columns) => {
                let mut ranges = self.ranges.clone();
                ranges.push(range);
                Self {
                    kind: self.kind,
                    ranges: merge_ranges(ranges),
                }
            }
            _ => {
                // Kind switch (or expanding from None) starts over.
                match kind {
                    SelectionKind::Cells => Self::cells(range, range),
                    SelectionKind::None => Self::none(),
                    _ => Self {
                        kind,
                        ranges: merge_ranges(vec![range]),
                    },
                }
            }
        }
    }

    /// Toggle semantics for ⌘/Ctrl-click multi-select: a range already present
    /// as an exact member is removed (yielding `None` when the list empties);
    /// otherwise the range is added and the list re-merged.
    pub fn merge(&self, range: IndexRange, kind: SelectionKind) -> Self {
        if self.kind != kind
            || matches!(kind, SelectionKind::None | SelectionKind::Cells)
        {
            return self.expand(range, kind);
        }
        let normalized = if range[0] <= range[1] {
            range
        } else {
            [range[1], range[0]]
        };
        if self.ranges.contains(&normalized) {
            let ranges: Vec<IndexRange> = self
                .ranges
                .iter()
                .copied()
                .filter(|r| *r != normalized)
                .collect();
            if ranges.is_empty() {
                return Self::none();
            }
            return Self { kind, ranges };
        }
        let mut ranges = self.ranges.clone();
        ranges.push(normalized);
        Self {
            kind,
            ranges: merge_ranges(ranges),
        }
    }

    /// Interval containment for `Rows`/`Columns`; for `Cells` the range is
    /// interpreted as a `[column, row]` coordinate and tested against the
    /// selection rectangle.
    pub fn includes(&self, range: IndexRange) -> bool {
        match self.kind {
            SelectionKind::None => false,
            SelectionKind::Cells => self.includes_cell(range[0], range[1]),
            SelectionKind::Rows | SelectionKind::Columns => self
                .ranges
                .iter()
                .any(|r| range[0] >= r[0] && range[1] <= r[1]),
        }
    }

    /// Point-in-rectangle / interval membership for a single cell.
    pub fn includes_cell(&self, col: usize, row: usize) -> bool {
        match self.kind {
            SelectionKind::None => false,
            SelectionKind::Rows => self.includes([row, row]),
            SelectionKind::Columns => self.includes([col, col]),
            SelectionKind::Cells => self.cell_bounds().is_some_and(|[c0, r0, c1, r1]| {
                col >= c0 && col <= c1 && row >= r0 && row <= r1
            }),
        }
    }

    /// Canonical min/max-ordered form for transmission to host callbacks.
    /// Idempotent: serializing an already-normalized value is a no-op.
    pub fn serialize(&self) -> Self {
        match self.kind {
            SelectionKind::Cells => match self.cell_bounds() {
                Some([c0, r0, c1, r1]) => Self::cells([c0, r0], [c1, r1]),
                None => Self::none(),
            },
            // Rows/Columns are kept normalized by construction.
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_row_ranges_rejected() {
        assert!(CombinedSelection::rows(vec![]).is_err());
        assert!(CombinedSelection::columns(vec![]).is_err());
    }

    #[test]
    fn test_cells_always_two_ranges() {
        let sel = CombinedSelection::cells([1, 2], [4, 0]);
        assert_eq!(sel.ranges.len(), 2);
        assert_eq!(sel.cell_bounds(), Some([1, 0, 4, 2]));
    }

    #[test]
    fn test_overlapping_and_adjacent_ranges_merge() {
        let sel = CombinedSelection::rows(vec![[5, 7], [1, 3], [4, 4], [9, 9]]).unwrap();
        // [1,3] touches [4,4] touches [5,7], so all merge.
        assert_eq!(sel.ranges, vec![[1, 7], [9, 9]]);
    }

    #[test]
    fn test_reversed_range_normalized() {
        let sel = CombinedSelection::columns(vec![[6, 2]]).unwrap();
        assert_eq!(sel.ranges, vec![[2, 6]]);
    }

    #[test]
    fn test_merge_toggles_exact_range() {
        let sel = CombinedSelection::columns(vec![[2, 2]]).unwrap();
        let sel = sel.merge([4, 4], SelectionKind::Columns);
        assert_eq!(sel.ranges, vec![[2, 2], [4, 4]]);
        let sel = sel.merge([4, 4], SelectionKind::Columns);
        assert_eq!(sel.ranges, vec![[2, 2]]);
    }

    #[test]
    fn test_merge_to_empty_becomes_none() {
        let sel = CombinedSelection::rows(vec![[3, 3]]).unwrap();
        let sel = sel.merge([3, 3], SelectionKind::Rows);
        assert!(sel.is_none());
    }

    #[test]
    fn test_expand_moves_focus() {
        let sel = CombinedSelection::cells([1, 1], [1, 1]);
        let sel = sel.expand([5, 9], SelectionKind::Cells);
        assert_eq!(sel.anchor(), Some([1, 1]));
        assert_eq!(sel.focus(), Some([5, 9]));
    }

    #[test]
    fn test_expand_then_serialize_idempotent() {
        let sel = CombinedSelection::cells([4, 7], [2, 3]);
        let normalized = sel.serialize();
        assert_eq!(normalized, CombinedSelection::cells([2, 3], [4, 7]));
        assert_eq!(normalized.serialize(), normalized);
    }

    #[test]
    fn test_includes_cell() {
        let sel = CombinedSelection::cells([1, 1], [3, 4]);
        assert!(sel.includes_cell(2, 2));
        assert!(sel.includes_cell(1, 4));
        assert!(!sel.includes_cell(0, 2));
        assert!(!sel.includes_cell(2, 5));

        let rows = CombinedSelection::rows(vec![[2, 4]]).unwrap();
        assert!(rows.includes_cell(99, 3));
        assert!(!rows.includes_cell(0, 5));
    }

    #[test]
    fn test_includes_interval() {
        let cols = CombinedSelection::columns(vec![[2, 6], [9, 9]]).unwrap();
        assert!(cols.includes([3, 5]));
        assert!(cols.includes([9, 9]));
        assert!(!cols.includes([5, 8]));
    }
}
