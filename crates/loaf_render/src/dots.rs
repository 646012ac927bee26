use std::fmt;

pub const DOT_GROUP: u64 = 5;
pub const MAX_DISPLAY_DOTS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotGroups {
    shown: u64,
    hidden: u64,
}

impl DotGroups {
    pub fn new(count: i64) -> Self {
        let count = u64::try_from(count).unwrap_or(0);
        let shown = count.min(MAX_DISPLAY_DOTS);
        Self {
            shown,
            hidden: count - shown,
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = u64> + '_ {
        let full = self.shown / DOT_GROUP;
        let rest = self.shown % DOT_GROUP;
        (0..full)
            .map(|_| DOT_GROUP)
            .chain((rest > 0).then_some(rest))
    }

    pub fn shown(&self) -> u64 {
        self.shown
    }

    pub fn hidden(&self) -> u64 {
        self.hidden
    }
}

impl fmt::Display for DotGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, size) in self.groups().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            for _ in 0..size {
                f.write_str(".")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_five() {
        let dots = DotGroups::new(12);
        assert_eq!(dots.groups().collect::<Vec<_>>(), vec![5, 5, 2]);
        assert_eq!(dots.to_string(), "..... ..... ..");
        assert_eq!(dots.hidden(), 0);
    }

    #[test]
    fn exact_multiple_has_no_short_group() {
        assert_eq!(DotGroups::new(10).to_string(), "..... .....");
    }

    #[test]
    fn caps_display_and_counts_hidden() {
        let dots = DotGroups::new(2_013);
        assert_eq!(dots.shown(), MAX_DISPLAY_DOTS);
        assert_eq!(dots.hidden(), 13);
        assert_eq!(dots.groups().count(), 400);
    }

    #[test]
    fn non_positive_counts_draw_nothing() {
        assert_eq!(DotGroups::new(0).to_string(), "");
        assert_eq!(DotGroups::new(-3).to_string(), "");
    }
}
