use chrono::{Local, Timelike};

/// One reading of the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

impl TimeOfDay {
    pub fn new(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            milliseconds,
        }
    }

    /// Milliseconds truncated to hundredths of a second (0-99).
    pub fn hundredths(&self) -> u32 {
        self.milliseconds / 10
    }

    /// The displayed fields in left-to-right order.
    pub fn fields(&self, hundredths: bool) -> Vec<i64> {
        let mut fields = vec![
            self.hours as i64,
            self.minutes as i64,
            self.seconds as i64,
        ];
        if hundredths {
            fields.push(self.hundredths() as i64);
        }
        fields
    }
}

pub trait TimeSource {
    fn now(&self) -> TimeOfDay;
}

/// The local wall clock.
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> TimeOfDay {
        let now = Local::now();
        // Leap seconds are reported as nanosecond values past 1e9.
        let milliseconds = (now.nanosecond() / 1_000_000).min(999);
        TimeOfDay::new(now.hour(), now.minute(), now.second(), milliseconds)
    }
}
