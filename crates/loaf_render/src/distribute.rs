use crate::{
    color::{bake_color, Hsl},
    mask::{CellKind, CellMask, FillableCell},
};

pub const QUANTUM: i64 = 5;
const OPACITY_FLOOR: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub accumulated: i64,
    pub capacity: i64,
}

impl ProgressState {
    pub fn new(accumulated: i64, capacity: i64) -> Self {
        Self {
            accumulated,
            capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRenderState {
    pub row: usize,
    pub col: usize,
    pub kind: CellKind,
    pub fill_ratio: f64,
    pub color: Hsl,
    /// 0 for an untouched cell, otherwise in `[0.4, 1]`.
    pub opacity: f64,
    pub is_active_partial: bool,
}

impl CellRenderState {
    fn empty(cell: &FillableCell) -> Self {
        Self {
            row: cell.row,
            col: cell.col,
            kind: cell.kind,
            fill_ratio: 0.0,
            color: bake_color(0.0),
            opacity: 0.0,
            is_active_partial: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fill_ratio == 0.0
    }
}

/// Distributes `state.accumulated` over the fillable cells of `mask` in scan
/// order, each cell claiming up to `capacity / capacity_units` units before
/// the next one is considered.
///
/// All arithmetic is done on integers scaled by the number of fillable
/// cells, so per-cell quotas are exact even when they are not whole units.
pub fn render(state: ProgressState, mask: &CellMask) -> Vec<CellRenderState> {
    let cells = mask.fillable_cells();
    let units = cells.len() as i128;
    if state.capacity <= 0 || units == 0 {
        return cells.iter().map(CellRenderState::empty).collect();
    }

    // One cell's quota, scaled by `units`, is exactly `capacity`.
    let quota = i128::from(state.capacity);
    let accumulated = i128::from(state.accumulated.max(0)) * units;

    cells
        .iter()
        .scan(0_i128, |distributed, cell| {
            let here = (accumulated - *distributed).clamp(0, quota);
            *distributed += quota;
            Some(shade(cell, here, quota, units))
        })
        .collect()
}

fn shade(cell: &FillableCell, here: i128, quota: i128, units: i128) -> CellRenderState {
    if here == 0 {
        return CellRenderState::empty(cell);
    }
    let fill_ratio = fill_ratio(here, quota, units);
    CellRenderState {
        row: cell.row,
        col: cell.col,
        kind: cell.kind,
        fill_ratio,
        color: bake_color(fill_ratio),
        opacity: OPACITY_FLOOR + (1.0 - OPACITY_FLOOR) * fill_ratio,
        is_active_partial: here < quota,
    }
}

/// `here` and `quota` are scaled by `units`; one unit is `units`.
fn fill_ratio(here: i128, quota: i128, units: i128) -> f64 {
    if here >= quota {
        return 1.0;
    }
    let step = i128::from(QUANTUM) * units;
    let quantized = here / step * step;
    // The first unit in a cell is always visible.
    let visible = if quantized == 0 { units } else { quantized };
    (visible as f64 / quota as f64).min(1.0)
}

#[cfg(test)]
#[path = "tests/distribute_tests.rs"]
mod tests;
