use std::time::{Duration, Instant};

use log::{info, trace};

use crate::canvas::Canvas;
use crate::display::BinaryDisplay;
use crate::error::Error;
use crate::time::TimeSource;
use crate::timer::Interval;

/// Horizontal distance between neighbouring displays, in grid units.
pub const GAP: f64 = 1.1;
/// How often running displays are refreshed.
pub const REFRESH: Duration = Duration::from_millis(10);
/// Largest surface edge accepted, the default GPU texture limit.
pub const MAX_SURFACE: u32 = 8192;
/// Hours, minutes, seconds and hundredths.
const MAX_FIELDS: usize = 4;

/// Pixel extents of `count` displays tiled left to right.
pub fn surface_size(size: f64, spacing: f64, count: usize) -> (f64, f64) {
    if count == 0 {
        return (0.0, 0.0);
    }
    let last = BinaryDisplay::new(0, (count - 1) as f64 * GAP, 0.0, size, spacing);
    let (width, height) = last.bounding_size();
    (last.origin().0 + width, height)
}

/// A binary clock session drawing onto `C` with times read from `T`.
///
/// Idle until [`start`](Clock::start), running until [`stop`](Clock::stop).
pub struct Clock<C, T> {
    canvas: C,
    time: T,
    displays: Vec<BinaryDisplay>,
    interval: Option<Interval>,
    size: f64,
    spacing: f64,
    hundredths: bool,
    // Field layout the running session was started with.
    session_hundredths: bool,
    display_width: Option<u32>,
}

impl<C: Canvas, T: TimeSource> Clock<C, T> {
    /// Fails if the cell geometry is degenerate or the widest layout would
    /// not fit a surface.
    pub fn new(canvas: C, time: T, size: f64, spacing: f64) -> Result<Self, Error> {
        if size.is_nan() || size < 1.0 {
            return Err(Error::InvalidSize);
        }
        if spacing.is_nan() || spacing < 0.0 {
            return Err(Error::InvalidSpacing);
        }
        let (width, height) = surface_size(size, spacing, MAX_FIELDS);
        if width > MAX_SURFACE as f64 || height > MAX_SURFACE as f64 {
            return Err(Error::SurfaceTooLarge {
                width,
                height,
                max: MAX_SURFACE,
            });
        }

        Ok(Self {
            canvas,
            time,
            displays: Vec::new(),
            interval: None,
            size,
            spacing,
            hundredths: false,
            session_hundredths: false,
            display_width: None,
        })
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn hundredths(&self) -> bool {
        self.hundredths
    }

    /// Whether the next [`start`](Clock::start) shows hundredths of a second.
    pub fn set_hundredths(&mut self, enabled: bool) {
        self.hundredths = enabled;
    }

    /// Width the surface should be presented at, if one was requested.
    pub fn display_width(&self) -> Option<u32> {
        self.display_width
    }

    /// When the event loop must next call [`poll`](Clock::poll).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.interval.as_ref().map(Interval::next_due)
    }

    /// Starts a fresh session, cancelling any running one.
    pub fn start(&mut self, now: Instant) {
        self.interval = None;
        self.displays.clear();
        BinaryDisplay::clear_surface(&mut self.canvas);

        let time = self.time.now();
        self.session_hundredths = self.hundredths;
        self.displays = time
            .fields(self.session_hundredths)
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                BinaryDisplay::new(value, i as f64 * GAP, 0.0, self.size, self.spacing)
            })
            .collect();

        let height = self
            .displays
            .iter()
            .map(|d| d.bounding_size().1)
            .fold(0.0, f64::max);
        let width = self
            .displays
            .last()
            .map(|d| d.origin().0 + d.bounding_size().0)
            .unwrap_or(0.0);
        self.canvas.set_size(width as u32, height as u32);

        self.interval = Some(Interval::new(REFRESH, now));
        info!("Clock started at {:?}", time);
    }

    /// Cancels the refresh. What was drawn stays on the surface.
    pub fn stop(&mut self) {
        if self.interval.take().is_some() {
            info!("Clock stopped");
        }
    }

    /// Blanks the surface without touching the session.
    pub fn clear(&mut self) {
        info!("Clearing surface");
        BinaryDisplay::clear_surface(&mut self.canvas);
    }

    /// Requests a presentation width. Surface geometry is unaffected.
    pub fn resize(&mut self, width_px: u32) {
        info!("Display width set to {}px", width_px);
        self.display_width = Some(width_px);
    }

    /// Runs a tick if one is due. Returns whether anything was drawn.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = match self.interval.as_mut() {
            Some(interval) => interval.poll(now),
            None => false,
        };
        if due {
            self.tick();
        }
        due
    }

    // All displays share one sample so the fields agree within a tick.
    fn tick(&mut self) {
        let time = self.time.now();
        trace!("Tick at {:?}", time);
        let fields = time.fields(self.session_hundredths);
        for (display, value) in self.displays.iter_mut().zip(fields) {
            display.update(value, &mut self.canvas);
        }
    }
}

#[cfg(test)]
impl<C, T> Clock<C, T> {
    pub fn displays(&self) -> &[BinaryDisplay] {
        &self.displays
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::canvas::FrameCanvas;
    use crate::color::Color;
    use crate::display::tests::{Call, RecordingCanvas};
    use crate::time::TimeOfDay;

    // Shares its reading with the test so time can move after the clock owns it.
    #[derive(Clone)]
    struct FixedTime(Rc<Cell<TimeOfDay>>);

    impl FixedTime {
        fn at(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
            Self(Rc::new(Cell::new(TimeOfDay::new(
                hours,
                minutes,
                seconds,
                milliseconds,
            ))))
        }

        fn set(&self, time: TimeOfDay) {
            self.0.set(time);
        }
    }

    impl TimeSource for FixedTime {
        fn now(&self) -> TimeOfDay {
            self.0.get()
        }
    }

    fn recording_clock(time: FixedTime) -> Clock<RecordingCanvas, FixedTime> {
        Clock::new(RecordingCanvas::new(300, 150), time, 30.0, 2.0).unwrap()
    }

    fn values<C: Canvas, T: TimeSource>(clock: &Clock<C, T>) -> Vec<Option<u8>> {
        clock.displays().iter().map(BinaryDisplay::value).collect()
    }

    #[test]
    fn test_start_creates_displays_from_time() {
        let time = FixedTime::at(14, 7, 5, 340);
        let mut clock = recording_clock(time);
        let start = Instant::now();
        clock.start(start);

        assert!(clock.is_running());
        assert_eq!(values(&clock), vec![Some(14), Some(7), Some(5)]);
        // 64px per grid unit: last display sits at 2.2 units and is 62px wide
        assert_eq!(clock.canvas().width, 202);
        assert_eq!(clock.canvas().height, 126);
        assert_eq!(clock.next_deadline(), Some(start + REFRESH));
    }

    #[test]
    fn test_start_with_hundredths() {
        let time = FixedTime::at(14, 7, 5, 340);
        let mut clock = recording_clock(time);
        clock.set_hundredths(true);
        clock.start(Instant::now());

        assert_eq!(values(&clock), vec![Some(14), Some(7), Some(5), Some(34)]);
        assert_eq!(clock.canvas().width, (64.0 * 3.3 + 62.0) as u32);
    }

    #[test]
    fn test_displays_tile_left_to_right() {
        let mut clock = recording_clock(FixedTime::at(1, 2, 3, 0));
        clock.set_hundredths(true);
        clock.start(Instant::now());

        for pair in clock.displays().windows(2) {
            let (left_x, _) = pair[0].origin();
            let (right_x, _) = pair[1].origin();
            let (width, _) = pair[0].bounding_size();
            assert!(left_x + width < right_x);
        }
    }

    #[test]
    fn test_first_tick_redraws_current_values() {
        let time = FixedTime::at(14, 7, 5, 340);
        let mut clock = recording_clock(time.clone());
        let start = Instant::now();
        clock.start(start);
        clock.canvas.calls.clear();

        assert!(!clock.poll(start + Duration::from_millis(5)));
        assert!(clock.canvas().calls.is_empty());

        time.set(TimeOfDay::new(14, 7, 6, 0));
        assert!(clock.poll(start + REFRESH));
        assert_eq!(clock.canvas().fills().len(), 24);
        assert_eq!(values(&clock), vec![Some(14), Some(7), Some(6)]);
    }

    #[test]
    fn test_start_twice_replaces_session() {
        let time = FixedTime::at(10, 20, 30, 0);
        let mut clock = recording_clock(time.clone());
        let first = Instant::now();
        clock.start(first);
        let second = first + Duration::from_millis(3);
        clock.set_hundredths(true);
        time.set(TimeOfDay::new(11, 21, 31, 500));
        clock.start(second);

        assert_eq!(
            values(&clock),
            vec![Some(11), Some(21), Some(31), Some(50)]
        );
        assert_eq!(clock.next_deadline(), Some(second + REFRESH));

        // The first session's deadline must not fire.
        clock.canvas.calls.clear();
        assert!(!clock.poll(first + REFRESH));
        assert!(clock.canvas().calls.is_empty());

        // Exactly one refresh per due tick.
        assert!(clock.poll(second + REFRESH));
        assert_eq!(clock.canvas().fills().len(), 32);
    }

    #[test]
    fn test_stop_prevents_further_draws() {
        let mut clock = recording_clock(FixedTime::at(9, 0, 0, 0));
        let start = Instant::now();
        clock.start(start);
        assert!(clock.poll(start + REFRESH));

        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.next_deadline(), None);
        clock.canvas.calls.clear();

        for ms in (20..=120).step_by(10) {
            assert!(!clock.poll(start + Duration::from_millis(ms)));
        }
        assert!(clock.canvas().calls.is_empty());
        assert_eq!(values(&clock), vec![Some(9), Some(0), Some(0)]);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut clock = recording_clock(FixedTime::at(9, 0, 0, 0));
        clock.stop();
        assert!(!clock.is_running());
        assert!(clock.displays().is_empty());
    }

    #[test]
    fn test_hundredths_toggle_waits_for_restart() {
        let time = FixedTime::at(9, 0, 0, 770);
        let mut clock = recording_clock(time);
        let start = Instant::now();
        clock.start(start);
        clock.set_hundredths(true);
        clock.canvas.calls.clear();

        assert!(clock.poll(start + REFRESH));
        assert_eq!(clock.displays().len(), 3);
        assert_eq!(clock.canvas().fills().len(), 24);
    }

    #[test]
    fn test_hundredths_toggled_off_keeps_updating_all_displays() {
        let time = FixedTime::at(9, 0, 0, 770);
        let mut clock = recording_clock(time.clone());
        clock.set_hundredths(true);
        let start = Instant::now();
        clock.start(start);
        clock.set_hundredths(false);
        clock.canvas.calls.clear();

        time.set(TimeOfDay::new(9, 0, 1, 120));
        assert!(clock.poll(start + REFRESH));
        assert_eq!(values(&clock), vec![Some(9), Some(0), Some(1), Some(12)]);
        assert_eq!(clock.canvas().fills().len(), 32);
    }

    #[test]
    fn test_new_rejects_bad_geometry() {
        let time = FixedTime::at(0, 0, 0, 0);
        let new = |size, spacing| {
            Clock::new(FrameCanvas::new(300, 150), time.clone(), size, spacing).err()
        };

        assert!(matches!(new(0.0, 2.0), Some(Error::InvalidSize)));
        assert!(matches!(new(f64::NAN, 2.0), Some(Error::InvalidSize)));
        assert!(matches!(new(30.0, -1.0), Some(Error::InvalidSpacing)));
        assert!(matches!(
            new(100_000.0, 2.0),
            Some(Error::SurfaceTooLarge { max: MAX_SURFACE, .. })
        ));
        assert!(new(30.0, 2.0).is_none());
    }

    #[test]
    fn test_largest_accepted_size_fits_surface() {
        let time = FixedTime::at(23, 59, 59, 990);
        // 4 displays span 3.3 units of 2 * (size + spacing) plus one display.
        let mut size = 1.0;
        while surface_size(size + 1.0, 0.0, 4).0 <= MAX_SURFACE as f64 {
            size += 1.0;
        }
        assert!(Clock::new(RecordingCanvas::new(1, 1), time.clone(), size + 1.0, 0.0).is_err());

        let mut clock = Clock::new(RecordingCanvas::new(1, 1), time, size, 0.0).unwrap();
        clock.set_hundredths(true);
        clock.start(Instant::now());
        assert!(clock.canvas().width <= MAX_SURFACE);
        assert!(clock.canvas().height <= MAX_SURFACE);
    }

    #[test]
    fn test_surface_size_matches_started_layout() {
        let mut clock = recording_clock(FixedTime::at(14, 7, 5, 340));
        clock.start(Instant::now());
        let (width, height) = surface_size(30.0, 2.0, 3);
        assert_eq!(clock.canvas().width, width as u32);
        assert_eq!(clock.canvas().height, height as u32);
        assert_eq!(surface_size(30.0, 2.0, 0), (0.0, 0.0));
    }

    #[test]
    fn test_clear_blanks_pixels_in_any_state() {
        let time = FixedTime::at(23, 59, 59, 990);
        let mut clock = Clock::new(FrameCanvas::new(1, 1), time, 30.0, 2.0).unwrap();
        let start = Instant::now();
        clock.start(start);
        assert!(clock.poll(start + REFRESH));
        assert!(clock.canvas().pixels().iter().any(|&p| p == Color::ON));

        clock.clear();
        assert!(clock.is_running());
        assert!(clock
            .canvas()
            .pixels()
            .iter()
            .all(|&p| p == Color::BACKGROUND));

        assert!(clock.poll(start + REFRESH * 2));
        clock.stop();
        clock.clear();
        assert!(clock
            .canvas()
            .pixels()
            .iter()
            .all(|&p| p == Color::BACKGROUND));
    }

    #[test]
    fn test_clear_when_idle_covers_surface() {
        let mut clock = recording_clock(FixedTime::at(0, 0, 0, 0));
        clock.clear();
        assert_eq!(
            clock.canvas().calls,
            vec![Call::Clear(0.0, 0.0, 300.0, 150.0)]
        );
    }

    #[test]
    fn test_resize_only_sets_width_hint() {
        let mut clock = recording_clock(FixedTime::at(12, 30, 0, 0));
        let start = Instant::now();
        clock.start(start);
        let origins: Vec<_> = clock.displays().iter().map(BinaryDisplay::origin).collect();

        clock.resize(640);

        assert_eq!(clock.display_width(), Some(640));
        assert_eq!(clock.canvas().width, 202);
        assert!(clock.is_running());
        let after: Vec<_> = clock.displays().iter().map(BinaryDisplay::origin).collect();
        assert_eq!(origins, after);
    }

    #[test]
    fn test_bad_sample_does_not_stop_clock() {
        let time = FixedTime::at(12, 0, 0, 0);
        let mut clock = recording_clock(time.clone());
        let start = Instant::now();
        clock.start(start);

        time.set(TimeOfDay::new(300, 1, 1, 0));
        assert!(clock.poll(start + REFRESH));
        assert_eq!(values(&clock), vec![Some(12), Some(1), Some(1)]);
        assert!(clock.is_running());
    }
}
