use std::fmt;
use std::time::Duration;

/// Wall-clock time split into days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub total: u64,
}

impl From<Duration> for Elapsed {
    fn from(d: Duration) -> Self {
        let total = d.as_secs();

        Self {
            days: total / 86400,
            hours: total % 86400 / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
            total,
        }
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} day{}, {} hour{}, {} minute{} & {} second{}\n({} second{})",
            self.days,
            plural(self.days),
            self.hours,
            plural(self.hours),
            self.minutes,
            plural(self.minutes),
            self.seconds,
            plural(self.seconds),
            self.total,
            plural(self.total),
        )
    }
}
