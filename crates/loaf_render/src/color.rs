use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn lerp(self, to: Hsl, t: f64) -> Hsl {
        Hsl {
            h: self.h + (to.h - self.h) * t,
            s: self.s + (to.s - self.s) * t,
            l: self.l + (to.l - self.l) * t,
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.h.rem_euclid(360.0) / 60.0;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Rgb::new(channel(r + m), channel(g + m), channel(b + m))
    }
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({:.1}, {:.1}%, {:.1}%)", self.h, self.s, self.l)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn over(self, background: Rgb, opacity: f64) -> Rgb {
        let alpha = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const BAKE_STOPS: [(f64, Hsl); 4] = [
    (0.0, Hsl::new(45.0, 100.0, 94.0)),
    (0.3, Hsl::new(40.0, 90.0, 80.0)),
    (0.6, Hsl::new(30.0, 90.0, 60.0)),
    (1.0, Hsl::new(25.0, 85.0, 45.0)),
];

/// Color of a cell filled to `ratio`. Out-of-range and NaN ratios clamp.
pub fn bake_color(ratio: f64) -> Hsl {
    let ratio = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    };
    let segment = BAKE_STOPS
        .windows(2)
        .position(|pair| ratio < pair[1].0)
        .unwrap_or(BAKE_STOPS.len() - 2);
    segment_color(segment, ratio)
}

fn segment_color(segment: usize, ratio: f64) -> Hsl {
    let (start, from) = BAKE_STOPS[segment];
    let (end, to) = BAKE_STOPS[segment + 1];
    from.lerp(to, (ratio - start) / (end - start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Hsl, b: Hsl) -> bool {
        (a.h - b.h).abs() < 1e-9 && (a.s - b.s).abs() < 1e-9 && (a.l - b.l).abs() < 1e-9
    }

    #[test]
    fn gradient_hits_control_points() {
        for (ratio, color) in BAKE_STOPS {
            assert!(close(bake_color(ratio), color), "ratio {ratio}");
        }
    }

    #[test]
    fn gradient_is_continuous_at_segment_boundaries() {
        for segment in 0..BAKE_STOPS.len() - 2 {
            let boundary = BAKE_STOPS[segment + 1].0;
            let below = segment_color(segment, boundary);
            let above = segment_color(segment + 1, boundary);
            assert!(close(below, above), "boundary {boundary}: {below} vs {above}");
        }
    }

    #[test]
    fn gradient_darkens_monotonically() {
        let mut previous = bake_color(0.0);
        for step in 1..=100 {
            let next = bake_color(f64::from(step) / 100.0);
            assert!(next.l <= previous.l);
            assert!(next.h <= previous.h);
            previous = next;
        }
    }

    #[test]
    fn invalid_ratios_clamp() {
        assert!(close(bake_color(f64::NAN), BAKE_STOPS[0].1));
        assert!(close(bake_color(-3.0), BAKE_STOPS[0].1));
        assert!(close(bake_color(7.0), BAKE_STOPS[3].1));
    }

    #[test]
    fn converts_known_colors_to_rgb() {
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsl::new(120.0, 100.0, 25.0).to_rgb(), Rgb::new(0, 128, 0));
        assert_eq!(Hsl::new(25.0, 0.0, 100.0).to_rgb(), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::new(139, 69, 19).to_string(), "#8B4513");
    }

    #[test]
    fn blending_respects_opacity() {
        let white = Rgb::new(255, 255, 255);
        let black = Rgb::new(0, 0, 0);
        assert_eq!(white.over(black, 1.0), white);
        assert_eq!(white.over(black, 0.0), black);
        assert_eq!(white.over(black, 0.4), Rgb::new(102, 102, 102));
    }
}
