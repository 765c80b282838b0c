use std::fmt;

/// The time scope used to filter transactions for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Month,
    Year,
    /// Anything that is not one of the named windows; no filtering is applied.
    All,
}

impl TimeWindow {
    /// Unknown labels fall back to [`TimeWindow::All`] instead of failing.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "day" => TimeWindow::Day,
            "month" => TimeWindow::Month,
            "year" => TimeWindow::Year,
            _ => TimeWindow::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TimeWindow::Day => "today",
            TimeWindow::Month => "this month",
            TimeWindow::Year => "this year",
            TimeWindow::All => "all time",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeWindow::Day => TimeWindow::Month,
            TimeWindow::Month => TimeWindow::Year,
            TimeWindow::Year => TimeWindow::All,
            TimeWindow::All => TimeWindow::Day,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_known_windows() {
        assert_eq!(TimeWindow::from_label("day"), TimeWindow::Day);
        assert_eq!(TimeWindow::from_label(" Month "), TimeWindow::Month);
        assert_eq!(TimeWindow::from_label("YEAR"), TimeWindow::Year);
    }

    #[test]
    fn test_from_label_unknown_falls_back_to_all() {
        assert_eq!(TimeWindow::from_label("week"), TimeWindow::All);
        assert_eq!(TimeWindow::from_label(""), TimeWindow::All);
    }

    #[test]
    fn test_next_cycles_through_every_window() {
        let mut window = TimeWindow::Day;
        let mut seen = vec![window];
        for _ in 0..3 {
            window = window.next();
            seen.push(window);
        }
        assert_eq!(
            seen,
            vec![TimeWindow::Day, TimeWindow::Month, TimeWindow::Year, TimeWindow::All]
        );
        assert_eq!(window.next(), TimeWindow::Day);
    }
}
