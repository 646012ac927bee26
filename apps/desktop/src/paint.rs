use loaf_render::{CellKind, CellMask, CellRenderState, Rgb};
use shared::protocol::Stats;

const BORDER: Rgb = Rgb::new(0x8B, 0x45, 0x13);
const CRUMB_EMPTY: Rgb = Rgb::new(0xF5, 0xDE, 0xB3);
const ACCENT_EMPTY: Rgb = Rgb::new(0xDE, 0xB8, 0x87);
const ACTIVE_MARK: &str = "▒▒";
const RESET: &str = "\x1b[0m";

pub fn paint_loaf(mask: &CellMask, cells: &[CellRenderState], color: bool) -> String {
    let mut grid = vec![None; mask.width() * mask.height()];
    for cell in cells {
        if let Some(slot) = grid.get_mut(cell.row * mask.width() + cell.col) {
            *slot = Some(cell);
        }
    }

    let mut out = String::new();
    for (row, kinds) in mask.rows().enumerate() {
        for (col, kind) in kinds.iter().enumerate() {
            let state = grid.get(row * mask.width() + col).copied().flatten();
            if color {
                paint_color(&mut out, *kind, state);
            } else {
                out.push_str(glyph(*kind, state));
            }
        }
        out.push('\n');
    }
    out
}

fn paint_color(out: &mut String, kind: CellKind, state: Option<&CellRenderState>) {
    let background = match kind {
        CellKind::Empty => {
            out.push_str("  ");
            return;
        }
        CellKind::Border => BORDER,
        CellKind::FillablePrimary => CRUMB_EMPTY,
        CellKind::FillableAccent => ACCENT_EMPTY,
    };
    let (fill, text) = match state {
        Some(state) if !state.is_empty() => {
            let fill = state.color.to_rgb().over(background, state.opacity);
            let text = if state.is_active_partial { ACTIVE_MARK } else { "  " };
            (fill, text)
        }
        _ => (background, "  "),
    };
    out.push_str(&format!(
        "\x1b[48;2;{};{};{}m\x1b[97m{text}{RESET}",
        fill.r, fill.g, fill.b
    ));
}

fn glyph(kind: CellKind, state: Option<&CellRenderState>) -> &'static str {
    const LEVELS: [&str; 10] = ["00", "11", "22", "33", "44", "55", "66", "77", "88", "99"];
    match (kind, state) {
        (CellKind::Empty, _) => "  ",
        (CellKind::Border, _) => "##",
        (_, Some(state)) if state.fill_ratio >= 1.0 => "@@",
        (_, Some(state)) if !state.is_empty() => {
            let level = (state.fill_ratio * 10.0).floor() as usize;
            LEVELS[level.min(LEVELS.len() - 1)]
        }
        _ => "..",
    }
}

pub fn summary(stats: &Stats) -> String {
    format!(
        "{} / {} crumbs ({:.1}%)",
        stats.total_crumbs, stats.goal, stats.percent
    )
}

#[cfg(test)]
mod tests {
    use loaf_render::{render, ProgressState};

    use super::*;

    fn plain(accumulated: i64) -> Vec<String> {
        let mask = CellMask::bolillo();
        let cells = render(ProgressState::new(accumulated, 80_000), mask);
        paint_loaf(mask, &cells, false)
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn ascii_loaf_has_one_line_per_row() {
        let lines = plain(0);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "        ################        ");
        assert_eq!(lines[1], "    ####................####    ");
    }

    #[test]
    fn ascii_loaf_shows_full_and_partial_cells() {
        let lines = plain(3_000);
        assert_eq!(lines[1], "    ####@@@@55..........####    ");
    }

    #[test]
    fn color_loaf_marks_active_cell() {
        let mask = CellMask::bolillo();
        let cells = render(ProgressState::new(3_000, 80_000), mask);
        let painted = paint_loaf(mask, &cells, true);
        assert_eq!(painted.matches(ACTIVE_MARK).count(), 1);
        assert_eq!(painted.lines().count(), 8);
    }

    #[test]
    fn color_cells_carry_truecolor_background() {
        let mask = CellMask::bolillo();
        let cells = render(ProgressState::new(0, 80_000), mask);
        let painted = paint_loaf(mask, &cells, true);
        let border = format!("\x1b[48;2;139;69;19m\x1b[97m  {RESET}");
        assert!(painted.starts_with(&format!("        {border}")));
        assert!(painted.contains("\x1b[48;2;245;222;179m"));
    }

    #[test]
    fn summary_reports_percent() {
        assert_eq!(summary(&Stats::new(20_000)), "20000 / 80000 crumbs (25.0%)");
    }
}
