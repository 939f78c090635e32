/// Daily ON window `[start_hour, end_hour)` for the scheduled relay.
///
/// Hours are stored exactly as received from the control surface; there is
/// no range validation. A window with `start_hour >= end_hour` contains no
/// hour at all, so the relay stays OFF around the clock. That matches the
/// deployed firmware and is deliberately not "fixed" into an overnight wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start_hour: i32,
    pub end_hour: i32,
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self {
            start_hour: 12,
            end_hour: 18,
        }
    }
}

impl ScheduleWindow {
    pub fn contains(&self, hour: i32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_window_covers_afternoon() {
        let window = ScheduleWindow::default();
        assert!(window.contains(12));
        assert!(window.contains(14));
        assert!(window.contains(17));
        assert!(!window.contains(11));
        assert!(!window.contains(18));
        assert!(!window.contains(20));
    }

    #[test]
    fn membership_over_all_hours() {
        let window = ScheduleWindow {
            start_hour: 6,
            end_hour: 9,
        };
        for hour in 0..24 {
            assert_eq!(window.contains(hour), (6..9).contains(&hour), "hour {hour}");
        }
    }

    #[test]
    fn inverted_window_is_empty() {
        let window = ScheduleWindow {
            start_hour: 22,
            end_hour: 6,
        };
        for hour in 0..24 {
            assert!(!window.contains(hour), "hour {hour}");
        }
    }

    #[test]
    fn out_of_range_hours_compare_literally() {
        let window = ScheduleWindow {
            start_hour: 25,
            end_hour: -3,
        };
        for hour in 0..24 {
            assert!(!window.contains(hour));
        }

        let wide = ScheduleWindow {
            start_hour: -5,
            end_hour: 40,
        };
        for hour in 0..24 {
            assert!(wide.contains(hour));
        }
    }
}
