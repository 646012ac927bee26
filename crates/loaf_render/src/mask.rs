use std::sync::OnceLock;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Border,
    FillablePrimary,
    FillableAccent,
}

impl CellKind {
    /// Numeric codes used by mask art: 0 empty, 1 border, 2 crumb, 3 accent.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Border),
            2 => Some(Self::FillablePrimary),
            3 => Some(Self::FillableAccent),
            _ => None,
        }
    }

    pub fn is_fillable(self) -> bool {
        matches!(self, Self::FillablePrimary | Self::FillableAccent)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("mask has no rows")]
    Empty,
    #[error("row {row} has {actual} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown cell code {code:?} at row {row} column {col}")]
    UnknownCode { row: usize, col: usize, code: char },
    #[error("mask has no fillable cells")]
    NoFillableCells,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillableCell {
    pub row: usize,
    pub col: usize,
    pub kind: CellKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMask {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
    fillable: Vec<FillableCell>,
}

const E: CellKind = CellKind::Empty;
const B: CellKind = CellKind::Border;
const P: CellKind = CellKind::FillablePrimary;
const A: CellKind = CellKind::FillableAccent;

#[rustfmt::skip]
const BOLILLO: [[CellKind; 16]; 8] = [
    [E, E, E, E, B, B, B, B, B, B, B, B, E, E, E, E],
    [E, E, B, B, P, P, P, P, P, P, P, P, B, B, E, E],
    [E, B, P, P, P, P, P, P, P, P, P, P, P, P, B, E],
    [B, P, P, P, P, P, P, A, A, P, P, P, P, P, P, B],
    [B, P, P, P, P, P, A, A, A, A, P, P, P, P, P, B],
    [E, B, P, P, P, P, P, P, P, P, P, P, P, P, B, E],
    [E, E, B, B, P, P, P, P, P, P, P, P, B, B, E, E],
    [E, E, E, E, B, B, B, B, B, B, B, B, E, E, E, E],
];

static BOLILLO_MASK: OnceLock<CellMask> = OnceLock::new();

impl CellMask {
    pub fn bolillo() -> &'static CellMask {
        BOLILLO_MASK.get_or_init(|| {
            let cells = BOLILLO.iter().flatten().copied().collect();
            Self::assemble(16, BOLILLO.len(), cells)
        })
    }

    /// Parses mask art: one line per row, one digit code per cell.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(art: &str) -> Result<Self, MaskError> {
        let mut width = None;
        let mut cells = Vec::new();
        let mut height = 0;

        for line in art.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let row = height;
            let mut count = 0;
            for (col, ch) in line.chars().enumerate() {
                let kind = ch
                    .to_digit(10)
                    .and_then(|code| u8::try_from(code).ok())
                    .and_then(CellKind::from_code)
                    .ok_or(MaskError::UnknownCode { row, col, code: ch })?;
                cells.push(kind);
                count += 1;
            }
            match width {
                None => width = Some(count),
                Some(expected) if expected != count => {
                    return Err(MaskError::Ragged {
                        row,
                        expected,
                        actual: count,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        let width = width.ok_or(MaskError::Empty)?;
        if !cells.iter().any(|kind| kind.is_fillable()) {
            return Err(MaskError::NoFillableCells);
        }
        Ok(Self::assemble(width, height, cells))
    }

    fn assemble(width: usize, height: usize, cells: Vec<CellKind>) -> Self {
        let fillable = cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| kind.is_fillable())
            .map(|(index, kind)| FillableCell {
                row: index / width,
                col: index % width,
                kind: *kind,
            })
            .collect();
        Self {
            width,
            height,
            cells,
            fillable,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn kind_at(&self, row: usize, col: usize) -> Option<CellKind> {
        if col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    pub fn capacity_units(&self) -> usize {
        self.fillable.len()
    }

    pub fn fillable_cells(&self) -> &[FillableCell] {
        &self.fillable
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellKind]> {
        self.cells.chunks(self.width)
    }
}
