//! Services carousel with auto-advance, swipe and keyboard navigation.
//!
//! Auto-advance is modelled as a single "next advance" deadline. Pausing
//! clears it; resuming after a delay `d` at time `t` sets it to
//! `t + d + interval`, which is when the restarted interval first fires.
//! Navigation of any kind is ignored while a slide transition is in flight.

use std::time::{Duration, Instant};

/// Shortest auto-advance interval accepted by [`Carousel::with_timing`].
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselTiming {
    pub interval: Duration,
    pub transition: Duration,
    pub initial_delay: Duration,
    pub resume_after_manual: Duration,
    pub resume_after_hover: Duration,
    pub resume_after_touch: Duration,
    pub resume_after_visible: Duration,
    /// Minimum horizontal travel for a swipe, in pixels (exclusive).
    pub swipe_distance: f32,
    /// A swipe must finish faster than this.
    pub swipe_max_duration: Duration,
}

impl Default for CarouselTiming {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(6000),
            transition: Duration::from_millis(600),
            initial_delay: Duration::from_millis(2000),
            resume_after_manual: Duration::from_millis(1500),
            resume_after_hover: Duration::from_millis(1000),
            resume_after_touch: Duration::from_millis(2000),
            resume_after_visible: Duration::from_millis(1000),
            swipe_distance: 60.0,
            swipe_max_duration: Duration::from_millis(400),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselKey {
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchStart {
    x: f32,
    at: Instant,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    current: usize,
    timing: CarouselTiming,
    transition_until: Option<Instant>,
    next_advance: Option<Instant>,
    hovered: bool,
    touch: Option<TouchStart>,
}

impl Carousel {
    pub fn new(len: usize, now: Instant) -> Self {
        Self::with_timing(len, CarouselTiming::default(), now)
    }

    /// A zero `interval` is raised to [`MIN_INTERVAL`].
    pub fn with_timing(len: usize, mut timing: CarouselTiming, now: Instant) -> Self {
        timing.interval = timing.interval.max(MIN_INTERVAL);
        let mut carousel = Self {
            len,
            current: 0,
            timing,
            transition_until: None,
            next_advance: None,
            hovered: false,
            touch: None,
        };
        carousel.resume_after(timing.initial_delay, now);
        carousel
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// When auto-advance will next move the carousel, if it is running.
    pub fn next_advance_at(&self) -> Option<Instant> {
        self.next_advance
    }

    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.transition_until.is_some_and(|until| now < until)
    }

    // -- timers --

    /// Fire any auto-advance that is due. Returns whether the slide changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut moved = false;
        while let Some(at) = self.next_advance.filter(|at| *at <= now) {
            self.next_advance = Some(at + self.timing.interval);
            if !self.is_transitioning(at) {
                moved |= self.step(1, at);
            }
        }
        moved
    }

    // -- navigation --

    pub fn next(&mut self, now: Instant) -> bool {
        let moved = self.step(1, now);
        self.restart_after_manual(now);
        moved
    }

    pub fn prev(&mut self, now: Instant) -> bool {
        let moved = self.step(-1, now);
        self.restart_after_manual(now);
        moved
    }

    /// Jump to a slide from an indicator. Selecting the current slide does
    /// nothing.
    pub fn go_to(&mut self, index: usize, now: Instant) -> bool {
        let moved = if index < self.len && index != self.current && !self.is_transitioning(now) {
            self.current = index;
            self.transition_until = Some(now + self.timing.transition);
            true
        } else {
            false
        };
        self.restart_after_manual(now);
        moved
    }

    pub fn key(&mut self, key: CarouselKey, now: Instant) -> bool {
        if self.is_transitioning(now) {
            return false;
        }
        match key {
            CarouselKey::ArrowLeft => self.prev(now),
            CarouselKey::ArrowRight => self.next(now),
        }
    }

    // -- pointer and touch --

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.next_advance = None;
    }

    pub fn pointer_leave(&mut self, now: Instant) {
        self.hovered = false;
        self.resume_after(self.timing.resume_after_hover, now);
    }

    pub fn touch_start(&mut self, x: f32, now: Instant) {
        if self.is_transitioning(now) {
            return;
        }
        self.touch = Some(TouchStart { x, at: now });
        self.next_advance = None;
    }

    /// Finish a touch. A fast enough horizontal swipe navigates: moving the
    /// finger left shows the next slide.
    pub fn touch_end(&mut self, x: f32, now: Instant) -> bool {
        let Some(start) = self.touch.take() else {
            return false;
        };
        let diff = start.x - x;
        let elapsed = now.saturating_duration_since(start.at);
        let moved = if diff.abs() > self.timing.swipe_distance
            && elapsed < self.timing.swipe_max_duration
        {
            self.step(if diff > 0.0 { 1 } else { -1 }, now)
        } else {
            false
        };
        self.resume_unless_hovered(self.timing.resume_after_touch, now);
        moved
    }

    // -- page visibility --

    pub fn visibility_changed(&mut self, visible: bool, now: Instant) {
        if visible {
            self.resume_unless_hovered(self.timing.resume_after_visible, now);
        } else {
            self.next_advance = None;
        }
    }

    // -- internals --

    fn step(&mut self, delta: isize, now: Instant) -> bool {
        if self.len == 0 || self.is_transitioning(now) {
            return false;
        }
        let len = self.len as isize;
        self.current = (self.current as isize + delta).rem_euclid(len) as usize;
        self.transition_until = Some(now + self.timing.transition);
        true
    }

    fn restart_after_manual(&mut self, now: Instant) {
        self.resume_unless_hovered(self.timing.resume_after_manual, now);
    }

    fn resume_unless_hovered(&mut self, delay: Duration, now: Instant) {
        if !self.hovered {
            self.resume_after(delay, now);
        }
    }

    fn resume_after(&mut self, delay: Duration, now: Instant) {
        self.next_advance = if self.len > 1 {
            Some(now + delay + self.timing.interval)
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn carousel() -> (Carousel, Instant) {
        let t0 = Instant::now();
        (Carousel::new(4, t0), t0)
    }

    // -- auto-advance --

    #[test]
    fn first_auto_advance_after_initial_delay_plus_interval() {
        let (mut c, t0) = carousel();
        assert!(!c.tick(t0 + ms(7999)));
        assert!(c.tick(t0 + ms(8000)));
        assert_eq!(c.current(), 1);
        assert!(c.tick(t0 + ms(14000)));
        assert_eq!(c.current(), 2);
    }

    #[test]
    fn wraps_around() {
        let (mut c, t0) = carousel();
        c.prev(t0);
        assert_eq!(c.current(), 3);
    }

    #[test]
    fn single_slide_never_auto_advances() {
        let t0 = Instant::now();
        let c = Carousel::new(1, t0);
        assert_eq!(c.next_advance_at(), None);
    }

    // -- transition lock --

    #[test]
    fn navigation_ignored_during_transition() {
        let (mut c, t0) = carousel();
        assert!(c.next(t0));
        assert!(!c.next(t0 + ms(300)));
        assert!(!c.key(CarouselKey::ArrowRight, t0 + ms(599)));
        assert_eq!(c.current(), 1);
        assert!(c.next(t0 + ms(600)));
        assert_eq!(c.current(), 2);
    }

    #[test]
    fn go_to_current_slide_is_noop() {
        let (mut c, t0) = carousel();
        assert!(!c.go_to(0, t0));
        assert!(c.go_to(3, t0));
        assert_eq!(c.current(), 3);
    }

    // -- pausing and resuming --

    #[test]
    fn manual_navigation_restarts_auto_advance() {
        let (mut c, t0) = carousel();
        c.next(t0 + ms(5000));
        assert_eq!(c.next_advance_at(), Some(t0 + ms(5000 + 1500 + 6000)));
    }

    #[test]
    fn hover_pauses_and_leave_resumes_after_one_second() {
        let (mut c, t0) = carousel();
        c.pointer_enter();
        assert!(!c.tick(t0 + ms(60_000)));
        c.next(t0 + ms(60_000));
        assert_eq!(c.next_advance_at(), None);

        c.pointer_leave(t0 + ms(61_000));
        assert_eq!(c.next_advance_at(), Some(t0 + ms(61_000 + 1000 + 6000)));
    }

    #[test]
    fn hidden_page_stops_and_visible_resumes() {
        let (mut c, t0) = carousel();
        c.visibility_changed(false, t0);
        assert!(!c.tick(t0 + ms(100_000)));
        c.visibility_changed(true, t0 + ms(100_000));
        assert!(c.tick(t0 + ms(107_000)));
    }

    #[test]
    fn hover_pause_survives_touch_and_visibility() {
        let (mut c, t0) = carousel();
        c.pointer_enter();
        c.touch_start(300.0, t0);
        assert!(c.touch_end(200.0, t0 + ms(100)));
        assert_eq!(c.next_advance_at(), None);

        c.visibility_changed(false, t0 + ms(1000));
        c.visibility_changed(true, t0 + ms(2000));
        assert_eq!(c.next_advance_at(), None);
        assert!(!c.tick(t0 + ms(60_000)));
    }

    #[test]
    fn zero_interval_still_terminates() {
        let t0 = Instant::now();
        let timing = CarouselTiming {
            interval: Duration::ZERO,
            transition: Duration::ZERO,
            initial_delay: Duration::ZERO,
            ..CarouselTiming::default()
        };
        let mut c = Carousel::with_timing(3, timing, t0);
        assert!(c.tick(t0 + ms(5)));
        assert_eq!(c.current(), 5 % 3);
        assert!(c.next_advance_at().is_some_and(|at| at > t0 + ms(5)));
    }

    // -- swipe --

    #[test]
    fn quick_left_swipe_goes_next() {
        let (mut c, t0) = carousel();
        c.touch_start(300.0, t0);
        assert!(c.touch_end(200.0, t0 + ms(200)));
        assert_eq!(c.current(), 1);
        assert_eq!(c.next_advance_at(), Some(t0 + ms(200 + 2000 + 6000)));
    }

    #[test]
    fn quick_right_swipe_goes_prev() {
        let (mut c, t0) = carousel();
        c.touch_start(100.0, t0);
        assert!(c.touch_end(170.0, t0 + ms(100)));
        assert_eq!(c.current(), 3);
    }

    #[test]
    fn short_or_slow_swipes_do_nothing() {
        let (mut c, t0) = carousel();
        c.touch_start(100.0, t0);
        assert!(!c.touch_end(160.0, t0 + ms(100)));
        c.touch_start(100.0, t0 + ms(1000));
        assert!(!c.touch_end(300.0, t0 + ms(1400)));
        assert_eq!(c.current(), 0);
    }

    #[test]
    fn touch_end_without_start_is_ignored() {
        let (mut c, t0) = carousel();
        assert!(!c.touch_end(0.0, t0));
    }
}
