use std::fmt;

pub const CREDITS_PER_COURSE: u32 = 3;
pub const TARGET_CREDITS: u32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadLabel {
    NotStarted,
    Light,
    Standard,
    Heavy,
}

impl LoadLabel {
    pub fn for_credits(credits: u32) -> Self {
        match credits {
            0 => LoadLabel::NotStarted,
            1..=11 => LoadLabel::Light,
            12..=18 => LoadLabel::Standard,
            _ => LoadLabel::Heavy,
        }
    }
}

impl fmt::Display for LoadLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadLabel::NotStarted => "Not started",
            LoadLabel::Light => "Light load",
            LoadLabel::Standard => "Standard load",
            LoadLabel::Heavy => "Heavy load",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadEstimate {
    pub courses: usize,
    pub credits: u32,
    pub target: u32,
    /// Share of the target already scheduled, clamped to 0..=100.
    pub percent: f64,
    pub label: LoadLabel,
}

impl LoadEstimate {
    /// Heights of the three dashboard overview bars, each capped at 100.
    pub fn overview_bars(&self) -> [f64; 3] {
        [
            (f64::from(self.credits) * 5.0).min(100.0),
            (self.courses as f64 * 10.0).min(100.0),
            self.percent,
        ]
    }
}

pub fn estimate(scheduled: usize) -> LoadEstimate {
    estimate_with(scheduled, CREDITS_PER_COURSE, TARGET_CREDITS)
}

pub fn estimate_with(scheduled: usize, credits_per_course: u32, target: u32) -> LoadEstimate {
    let credits = u32::try_from(scheduled)
        .unwrap_or(u32::MAX)
        .saturating_mul(credits_per_course);
    let percent = if target == 0 {
        if credits > 0 { 100.0 } else { 0.0 }
    } else {
        (f64::from(credits) * 100.0 / f64::from(target)).clamp(0.0, 100.0)
    };
    LoadEstimate {
        courses: scheduled,
        credits,
        target,
        percent,
        label: LoadLabel::for_credits(credits),
    }
}
