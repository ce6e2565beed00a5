//! Count-up animation for numeric scores.

/// How the running value is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterFormat {
    /// `42`
    Plain,
    /// `42%`
    Percent,
    /// `GPA: 8.4/10`
    Gpa,
}

impl CounterFormat {
    /// Extract the first number in `text` and infer the display format.
    pub fn parse(text: &str) -> Option<(f64, CounterFormat)> {
        let start = text.find(|c: char| c.is_ascii_digit() || c == '.')?;
        let rest = &text[start..];
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let value: f64 = rest[..end].parse().ok()?;
        let format = if text.contains('%') {
            CounterFormat::Percent
        } else if text.contains("GPA") {
            CounterFormat::Gpa
        } else {
            CounterFormat::Plain
        };
        Some((value, format))
    }

    /// Rendering of an in-flight value.
    fn running(self, current: f64) -> String {
        match self {
            CounterFormat::Plain => format!("{}", current.ceil()),
            CounterFormat::Percent => format!("{}%", current.ceil()),
            CounterFormat::Gpa => format!("GPA: {current:.1}/10"),
        }
    }

    /// Rendering of the exact target.
    pub fn finished(self, target: f64) -> String {
        match self {
            CounterFormat::Plain => format!("{target}"),
            CounterFormat::Percent => format!("{target}%"),
            CounterFormat::Gpa => format!("GPA: {target}/10"),
        }
    }
}

/// One tick of a counter.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterFrame {
    pub text: String,
    pub value: f64,
    pub done: bool,
}

#[derive(Clone, Debug)]
pub struct CounterAnimation {
    target: f64,
    steps: u32,
    taken: u32,
    current: f64,
    format: CounterFormat,
    done: bool,
}

impl CounterAnimation {
    /// Reach `target` in `steps` equal increments.
    pub fn stepped(target: f64, steps: u32, format: CounterFormat) -> Self {
        Self { target, steps: steps.max(1), taken: 0, current: 0.0, format, done: false }
    }

    /// Reach `target` over `duration_ms`, ticking every `frame_ms`.
    pub fn over_duration(target: f64, duration_ms: f64, frame_ms: f64, format: CounterFormat) -> Self {
        let steps = (duration_ms / frame_ms.max(1.0)).ceil().max(1.0) as u32;
        Self::stepped(target, steps, format)
    }

    /// Text shown before the first tick.
    pub fn initial_text(&self) -> String {
        self.format.finished(0.0)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn step(&mut self) -> CounterFrame {
        if !self.done {
            self.taken += 1;
            self.current = self.target * self.taken as f64 / self.steps as f64;
            if self.taken >= self.steps || self.current >= self.target {
                self.done = true;
            }
        }
        if self.done {
            CounterFrame { text: self.format.finished(self.target), value: self.target, done: true }
        } else {
            // Rounding up may overshoot on the last partial step.
            let value = match self.format {
                CounterFormat::Gpa => (self.current * 10.0).round() / 10.0,
                _ => self.current.ceil(),
            }
            .min(self.target);
            CounterFrame { text: self.format.running(self.current.min(self.target)), value, done: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_detects_format_and_value() {
        assert_eq!(CounterFormat::parse("95%"), Some((95.0, CounterFormat::Percent)));
        assert_eq!(CounterFormat::parse("GPA: 8.7/10"), Some((8.7, CounterFormat::Gpa)));
        assert_eq!(CounterFormat::parse("Score 42"), Some((42.0, CounterFormat::Plain)));
        assert_eq!(CounterFormat::parse("n/a"), None);
    }

    #[test]
    fn duration_counter_is_monotonic_and_lands_on_target() {
        let mut c = CounterAnimation::over_duration(100.0, 2_000.0, 16.0, CounterFormat::Plain);
        let mut last = 0.0;
        let mut frames = 0;
        loop {
            let f = c.step();
            assert!(f.value >= last, "{} after {}", f.value, last);
            last = f.value;
            frames += 1;
            if f.done {
                assert_eq!(f.text, "100");
                assert_eq!(f.value, 100.0);
                break;
            }
            assert!(frames < 1_000);
        }
        assert_eq!(frames, 125);
    }

    #[test]
    fn percent_and_gpa_render_their_suffixes() {
        let mut pct = CounterAnimation::stepped(95.0, 100, CounterFormat::Percent);
        assert_eq!(pct.initial_text(), "0%");
        assert_eq!(pct.step().text, "1%");

        let mut gpa = CounterAnimation::stepped(8.5, 100, CounterFormat::Gpa);
        assert_eq!(gpa.initial_text(), "GPA: 0/10");
        gpa.step();
        assert_eq!(gpa.step().text, "GPA: 0.2/10");
        let last = std::iter::repeat_with(|| gpa.step()).find(|f| f.done).unwrap();
        assert_eq!(last.text, "GPA: 8.5/10");
    }

    #[test]
    fn finished_counter_stays_finished() {
        let mut c = CounterAnimation::stepped(3.0, 1, CounterFormat::Plain);
        assert!(c.step().done);
        assert_eq!(c.step().text, "3");
        assert!(c.is_done());
    }
}
