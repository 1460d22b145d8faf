//! Slide sequencer for a tabbed fade carousel.

use crate::config::CarouselConfig;
use crate::fade::Fade;
use crate::render::SlideStyle;
use crate::tabs::{slide_index_from_tab_id, TabBar};
use crate::timer::Countdown;

/// Where to move relative to the current slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Next slide, wrapping from the last to the first
    Forward,
    /// Previous slide, wrapping from the first to the last
    Previous,
    /// A specific slide
    To(usize),
}

/// Current state of the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselState {
    /// The deferred start has not fired yet
    Waiting,
    /// A slide is shown and nothing is moving
    Idle,
    /// A fade is in flight
    Animating,
}

/// Something the sequencer did in response to an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselEvent {
    /// The deferred start fired
    Started,
    /// A fade from `from` to `to` began. Equal indices mean a show-only fade.
    TransitionStarted { from: usize, to: usize },
    /// A selection arrived while a fade was in flight and was discarded
    TransitionDropped { requested: usize },
    /// The fade finished and `index` is now the current slide
    TransitionFinished { index: usize },
    /// Autoplay will select `next` after `after_ms`
    AutoplayScheduled { next: usize, after_ms: u32 },
    /// Autoplay was switched off
    AutoplayStopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScheduledAdvance {
    countdown: Countdown,
    next: usize,
}

/// Platform-agnostic carousel sequencer.
///
/// The sequencer owns the slide indices, the tab selection, the fade in
/// flight and both timers, but reads no clock. The host calls
/// [`Carousel::tick`] with the elapsed milliseconds from its own timer and
/// reacts to the returned events, or just redraws from
/// [`Carousel::slide_styles`].
///
/// Selections that arrive while a fade is running are dropped, never
/// queued, so at most one transition is ever in flight.
///
/// ## Example
///
/// ```rust
/// use tab_carousel::{Carousel, CarouselConfig, CarouselEvent, CarouselState};
///
/// let mut config = CarouselConfig::new("tour");
/// config.speed_ms = 100;
/// config.delay_ms = 50;
///
/// let mut carousel = Carousel::new(3, config);
/// assert_eq!(carousel.state(), CarouselState::Waiting);
///
/// // The deferred start shows the first slide
/// let events = carousel.tick(50);
/// assert_eq!(events[0], CarouselEvent::Started);
/// assert!(carousel.is_animating());
///
/// carousel.tick(100);
/// assert_eq!(carousel.state(), CarouselState::Idle);
///
/// // A tab click moves to that slide
/// carousel.click_tab(2);
/// carousel.tick(100);
/// assert_eq!(carousel.current(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Carousel {
    config: CarouselConfig,
    tabs: TabBar,
    slide_count: usize,
    /// Slide shown when idle
    current: usize,
    /// Slide the last accepted selection pointed at
    target: usize,
    /// Slide fully shown, once the first fade completed
    shown: Option<usize>,
    /// Slide carrying the active marker
    active: Option<usize>,
    fade: Option<Fade>,
    start: Option<Countdown>,
    autoplay: bool,
    advance: Option<ScheduledAdvance>,
}

impl Carousel {
    /// Create a carousel over `slide_count` slides.
    ///
    /// All slides start hidden. The first slide is selected once
    /// `config.delay_ms` has elapsed.
    pub fn new(slide_count: usize, config: CarouselConfig) -> Self {
        Self::with_tabs(TabBar::with_count(slide_count), slide_count, config)
    }

    /// Create a carousel with explicit tab ids.
    pub fn with_tabs(tabs: TabBar, slide_count: usize, config: CarouselConfig) -> Self {
        if tabs.len() != slide_count {
            log::warn!(
                "carousel {} has {} tabs for {} slides",
                config.container_id,
                tabs.len(),
                slide_count
            );
        }
        let start = Some(Countdown::new(config.delay_ms));
        let autoplay = config.autoplay;
        Self {
            config,
            tabs,
            slide_count,
            current: 0,
            target: 0,
            shown: None,
            active: None,
            fade: None,
            start,
            autoplay,
            advance: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    #[inline]
    pub fn tabs(&self) -> &TabBar {
        &self.tabs
    }

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Index of the slide shown when idle.
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Index the last accepted selection pointed at.
    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Index carrying the active marker, if any.
    #[inline]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    #[inline]
    pub fn fade(&self) -> Option<&Fade> {
        self.fade.as_ref()
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.fade.is_some()
    }

    #[inline]
    pub fn is_autoplay(&self) -> bool {
        self.autoplay
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.start.is_none()
    }

    pub fn state(&self) -> CarouselState {
        if self.start.is_some() {
            CarouselState::Waiting
        } else if self.fade.is_some() {
            CarouselState::Animating
        } else {
            CarouselState::Idle
        }
    }

    /// Slide autoplay will select next and the time left until it does.
    pub fn pending_advance(&self) -> Option<(usize, u32)> {
        self.advance
            .as_ref()
            .map(|a| (a.next, a.countdown.remaining_ms()))
    }

    /// Compute the slide index reached by moving in `direction`.
    pub fn calc_next(&self, direction: Direction) -> usize {
        if self.slide_count == 0 {
            return 0;
        }
        match direction {
            Direction::Forward => (self.current + 1) % self.slide_count,
            Direction::Previous => {
                if self.current == 0 {
                    self.slide_count - 1
                } else {
                    self.current - 1
                }
            }
            Direction::To(index) => index.min(self.slide_count - 1),
        }
    }

    /// Advance timers and the running fade by `elapsed_ms`.
    ///
    /// Order within one tick: the deferred start, then the fade, then the
    /// autoplay countdown. Work started during a tick is not advanced by
    /// that same tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> Vec<CarouselEvent> {
        let mut events = Vec::new();
        let was_fading = self.fade.is_some();
        // Held aside so an advance scheduled during this tick is not advanced by it.
        let pending = self.advance.take();

        if let Some(start) = self.start.as_mut() {
            if start.advance(elapsed_ms) {
                self.start = None;
                log::debug!("carousel {} started", self.config.container_id);
                events.push(CarouselEvent::Started);
                events.extend(self.select(0));
            }
        }

        if was_fading {
            let done = self
                .fade
                .as_mut()
                .map(|fade| fade.advance(elapsed_ms))
                .unwrap_or(false);
            if done {
                events.extend(self.slide_change_done());
            }
        }

        // A fresh schedule from slide-change-done replaces the held one.
        if let Some(mut advance) = pending.filter(|_| self.advance.is_none()) {
            if advance.countdown.advance(elapsed_ms) {
                log::trace!("autoplay selecting slide {}", advance.next);
                events.extend(self.select(advance.next));
            } else {
                self.advance = Some(advance);
            }
        }

        events
    }

    /// Select the slide at `index` through the tab bar.
    ///
    /// Nothing happens when the tab is already selected or the index is
    /// out of range. While a fade is running the selection is dropped and
    /// the tab highlight stays where it is.
    pub fn select(&mut self, index: usize) -> Vec<CarouselEvent> {
        if index >= self.slide_count {
            log::debug!(
                "ignoring selection of slide {index}, carousel has {}",
                self.slide_count
            );
            return Vec::new();
        }
        if self.is_animating() {
            log::debug!("dropping selection of slide {index} during a transition");
            return vec![CarouselEvent::TransitionDropped { requested: index }];
        }
        match self.tabs.select(index) {
            Some(selected) => vec![self.begin_transition(selected)],
            None => Vec::new(),
        }
    }

    /// Select the slide named by a tab id such as `slide2`.
    ///
    /// A known tab resolves to the slide it points at; any other id is
    /// parsed for a slide number.
    pub fn select_tab_id(&mut self, id: &str) -> Vec<CarouselEvent> {
        let slide = match self.tabs.position(id) {
            Some(position) => self.tabs.slide_for_tab(position),
            None => slide_index_from_tab_id(id),
        };
        match slide {
            Some(index) => self.select(index),
            None => {
                log::debug!("tab id {id:?} names no slide");
                Vec::new()
            }
        }
    }

    /// Handle a user click on the tab at `position`.
    ///
    /// The tab's slide is selected. A click always stops autoplay, even
    /// when the selection itself is dropped.
    pub fn click_tab(&mut self, position: usize) -> Vec<CarouselEvent> {
        let mut events = self.stop_autoplay();
        match self.tabs.slide_for_tab(position) {
            Some(slide) => events.extend(self.select(slide)),
            None => log::debug!("no tab at position {position}"),
        }
        events
    }

    /// Select the slide reached by moving in `direction`.
    pub fn go(&mut self, direction: Direction) -> Vec<CarouselEvent> {
        if self.slide_count == 0 {
            return Vec::new();
        }
        let next = self.calc_next(direction);
        self.select(next)
    }

    /// Turn autoplay on and move to the next slide right away.
    ///
    /// Before the deferred start has fired only the flag is set; the first
    /// completed fade schedules the advance.
    pub fn start_autoplay(&mut self) -> Vec<CarouselEvent> {
        self.autoplay = true;
        self.advance = None;
        if !self.is_started() {
            return Vec::new();
        }
        self.go(Direction::Forward)
    }

    /// Turn autoplay off and cancel any scheduled advance.
    pub fn stop_autoplay(&mut self) -> Vec<CarouselEvent> {
        let was_on = self.autoplay || self.advance.is_some();
        self.autoplay = false;
        self.advance = None;
        if was_on {
            log::debug!("autoplay stopped");
            vec![CarouselEvent::AutoplayStopped]
        } else {
            Vec::new()
        }
    }

    /// Style the slide at `index` should have right now.
    pub fn slide_style(&self, index: usize) -> SlideStyle {
        let active = self.active == Some(index);
        if let Some(fade) = &self.fade {
            if fade.incoming() == index {
                return SlideStyle::new(true, fade.incoming_opacity(), active);
            }
            if fade.outgoing() == Some(index) {
                return SlideStyle::new(true, fade.outgoing_opacity(), active);
            }
        }
        if self.shown == Some(index) {
            SlideStyle::new(true, 1.0, active)
        } else {
            SlideStyle::new(false, 0.0, active)
        }
    }

    /// Styles for every slide, in order.
    pub fn slide_styles(&self) -> Vec<SlideStyle> {
        (0..self.slide_count).map(|i| self.slide_style(i)).collect()
    }

    fn begin_transition(&mut self, index: usize) -> CarouselEvent {
        let from = self.current;
        self.target = index;
        let fade = if from == index {
            Fade::show(index, self.config.speed_ms, self.config.easing)
        } else {
            Fade::cross(from, index, self.config.speed_ms, self.config.easing)
        };
        self.fade = Some(fade);
        self.shown = None;
        self.active = Some(index);
        log::debug!("slide transition {from} -> {index}");
        CarouselEvent::TransitionStarted { from, to: index }
    }

    fn slide_change_done(&mut self) -> Vec<CarouselEvent> {
        self.fade = None;
        self.current = self.target;
        self.shown = Some(self.current);
        let mut events = vec![CarouselEvent::TransitionFinished {
            index: self.current,
        }];

        if self.autoplay {
            let next = self.calc_next(Direction::Forward);
            let after_ms = self.config.duration_ms;
            self.advance = Some(ScheduledAdvance {
                countdown: Countdown::new(after_ms),
                next,
            });
            log::trace!("autoplay scheduled slide {next} in {after_ms}ms");
            events.push(CarouselEvent::AutoplayScheduled { next, after_ms });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarouselOptions;

    fn config(autoplay: bool) -> CarouselConfig {
        CarouselOptions {
            speed: Some(100),
            delay: Some(50),
            duration: Some(200),
            autoplay: Some(autoplay),
            ..Default::default()
        }
        .resolve("tour")
    }

    /// Carousel whose first slide is already shown.
    fn started(slides: usize, autoplay: bool) -> Carousel {
        let mut carousel = Carousel::new(slides, config(autoplay));
        carousel.tick(50);
        carousel.tick(100);
        carousel
    }

    #[test]
    fn test_deferred_start() {
        let mut carousel = Carousel::new(3, config(false));
        assert_eq!(carousel.state(), CarouselState::Waiting);
        assert!(carousel.slide_styles().iter().all(|s| !s.visible && s.opacity == 0.0));

        assert!(carousel.tick(49).is_empty());
        let events = carousel.tick(1);
        assert_eq!(
            events,
            vec![
                CarouselEvent::Started,
                CarouselEvent::TransitionStarted { from: 0, to: 0 },
            ]
        );
        assert_eq!(carousel.fade().and_then(Fade::outgoing), None);
        assert_eq!(carousel.tabs().selected(), Some(0));

        let events = carousel.tick(100);
        assert_eq!(events, vec![CarouselEvent::TransitionFinished { index: 0 }]);
        assert_eq!(carousel.state(), CarouselState::Idle);
        assert_eq!(carousel.slide_style(0), SlideStyle::new(true, 1.0, true));
    }

    #[test]
    fn test_zero_delay_starts_on_first_tick() {
        let mut carousel = Carousel::new(2, CarouselConfig::new("c"));
        let events = carousel.tick(0);
        assert_eq!(events[0], CarouselEvent::Started);
        assert!(carousel.is_animating());
    }

    #[test]
    fn test_calc_next_wraps() {
        let mut carousel = started(3, false);
        assert_eq!(carousel.calc_next(Direction::Forward), 1);
        assert_eq!(carousel.calc_next(Direction::Previous), 2);
        assert_eq!(carousel.calc_next(Direction::To(1)), 1);
        assert_eq!(carousel.calc_next(Direction::To(9)), 2);

        carousel.select(2);
        carousel.tick(100);
        assert_eq!(carousel.current(), 2);
        assert_eq!(carousel.calc_next(Direction::Forward), 0);
        assert_eq!(carousel.calc_next(Direction::Previous), 1);
    }

    #[test]
    fn test_cross_fade() {
        let mut carousel = started(3, false);
        let events = carousel.select(1);
        assert_eq!(events, vec![CarouselEvent::TransitionStarted { from: 0, to: 1 }]);
        assert_eq!(carousel.target(), 1);
        assert_eq!(carousel.current(), 0);
        assert_eq!(carousel.active(), Some(1));

        carousel.tick(50);
        let out = carousel.slide_style(0);
        let inc = carousel.slide_style(1);
        assert!(out.visible && inc.visible);
        assert!((out.opacity - 0.5).abs() < 1e-9);
        assert!((inc.opacity - 0.5).abs() < 1e-9);
        assert!(!carousel.slide_style(2).visible);

        carousel.tick(50);
        assert_eq!(carousel.current(), 1);
        assert_eq!(carousel.slide_style(0), SlideStyle::new(false, 0.0, false));
        assert_eq!(carousel.slide_style(1), SlideStyle::new(true, 1.0, true));
    }

    #[test]
    fn test_overlapping_selection_is_dropped() {
        let mut carousel = started(3, false);
        carousel.select(1);
        let events = carousel.select(2);
        assert_eq!(events, vec![CarouselEvent::TransitionDropped { requested: 2 }]);
        assert_eq!(carousel.target(), 1);
        assert_eq!(carousel.tabs().selected(), Some(1));

        carousel.tick(100);
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn test_reselecting_current_tab_does_nothing() {
        let mut carousel = started(3, false);
        assert!(carousel.select(0).is_empty());
        assert!(!carousel.is_animating());
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let mut carousel = started(3, false);
        assert!(carousel.select(3).is_empty());
        assert_eq!(carousel.current(), 0);
        assert_eq!(carousel.tabs().selected(), Some(0));
    }

    #[test]
    fn test_select_tab_id() {
        let mut carousel = started(3, false);
        let events = carousel.select_tab_id("slide2");
        assert_eq!(events, vec![CarouselEvent::TransitionStarted { from: 0, to: 2 }]);
        assert!(started(3, false).select_tab_id("nav").is_empty());
    }

    #[test]
    fn test_autoplay_cycle() {
        let mut carousel = Carousel::new(3, config(true));
        carousel.tick(50);
        let events = carousel.tick(100);
        assert_eq!(
            events,
            vec![
                CarouselEvent::TransitionFinished { index: 0 },
                CarouselEvent::AutoplayScheduled { next: 1, after_ms: 200 },
            ]
        );
        assert_eq!(carousel.pending_advance(), Some((1, 200)));

        assert!(carousel.tick(199).is_empty());
        let events = carousel.tick(1);
        assert_eq!(events, vec![CarouselEvent::TransitionStarted { from: 0, to: 1 }]);
        assert_eq!(carousel.pending_advance(), None);

        carousel.tick(100);
        carousel.tick(200);
        carousel.tick(100);
        assert_eq!(carousel.current(), 2);
        assert_eq!(carousel.pending_advance(), Some((0, 200)));

        carousel.tick(200);
        carousel.tick(100);
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn test_click_stops_autoplay() {
        let mut carousel = started(3, true);
        assert!(carousel.pending_advance().is_some());

        let events = carousel.click_tab(2);
        assert_eq!(
            events,
            vec![
                CarouselEvent::AutoplayStopped,
                CarouselEvent::TransitionStarted { from: 0, to: 2 },
            ]
        );
        assert!(!carousel.is_autoplay());

        let events = carousel.tick(100);
        assert_eq!(events, vec![CarouselEvent::TransitionFinished { index: 2 }]);
        assert_eq!(carousel.pending_advance(), None);
    }

    #[test]
    fn test_click_during_transition_still_stops_autoplay() {
        let mut carousel = started(3, true);
        carousel.tick(200);
        assert!(carousel.is_animating());

        let events = carousel.click_tab(2);
        assert_eq!(
            events,
            vec![
                CarouselEvent::AutoplayStopped,
                CarouselEvent::TransitionDropped { requested: 2 },
            ]
        );
        carousel.tick(100);
        assert_eq!(carousel.current(), 1);
        assert_eq!(carousel.pending_advance(), None);
    }

    #[test]
    fn test_start_and_stop_autoplay() {
        let mut carousel = started(3, false);
        let events = carousel.start_autoplay();
        assert_eq!(events, vec![CarouselEvent::TransitionStarted { from: 0, to: 1 }]);
        assert!(carousel.is_autoplay());

        carousel.tick(100);
        assert_eq!(carousel.pending_advance(), Some((2, 200)));

        assert_eq!(carousel.stop_autoplay(), vec![CarouselEvent::AutoplayStopped]);
        assert_eq!(carousel.pending_advance(), None);
        assert!(carousel.tick(1000).is_empty());
        assert_eq!(carousel.current(), 1);

        assert!(carousel.stop_autoplay().is_empty());
    }

    #[test]
    fn test_start_autoplay_before_start() {
        let mut carousel = Carousel::new(3, config(false));
        assert!(carousel.start_autoplay().is_empty());
        carousel.tick(50);
        let events = carousel.tick(100);
        assert_eq!(
            events.last(),
            Some(&CarouselEvent::AutoplayScheduled { next: 1, after_ms: 200 })
        );
    }

    #[test]
    fn test_single_slide_autoplay_stalls() {
        let mut carousel = started(1, true);
        assert_eq!(carousel.pending_advance(), Some((0, 200)));
        assert!(carousel.tick(200).is_empty());
        assert!(!carousel.is_animating());
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn test_previous_navigation() {
        let mut carousel = started(4, false);
        carousel.go(Direction::Previous);
        carousel.tick(100);
        assert_eq!(carousel.current(), 3);
    }

    #[test]
    fn test_schedule_from_finished_fade_is_not_advanced_same_tick() {
        let mut carousel = started(3, true);
        assert_eq!(carousel.pending_advance(), Some((1, 200)));

        carousel.go(Direction::Forward);
        // Overshoots the 100ms fade; the fresh schedule keeps its full duration
        let events = carousel.tick(150);
        assert_eq!(
            events,
            vec![
                CarouselEvent::TransitionFinished { index: 1 },
                CarouselEvent::AutoplayScheduled { next: 2, after_ms: 200 },
            ]
        );
        assert_eq!(carousel.pending_advance(), Some((2, 200)));

        assert!(carousel.tick(199).is_empty());
        let events = carousel.tick(1);
        assert_eq!(events, vec![CarouselEvent::TransitionStarted { from: 1, to: 2 }]);
    }

    #[test]
    fn test_zero_duration_waits_for_next_tick() {
        let mut config = config(true);
        config.duration_ms = 0;
        let mut carousel = Carousel::new(3, config);
        carousel.tick(50);

        let events = carousel.tick(100);
        assert_eq!(
            events,
            vec![
                CarouselEvent::TransitionFinished { index: 0 },
                CarouselEvent::AutoplayScheduled { next: 1, after_ms: 0 },
            ]
        );
        assert!(!carousel.is_animating());

        let events = carousel.tick(0);
        assert_eq!(events, vec![CarouselEvent::TransitionStarted { from: 0, to: 1 }]);
    }

    #[test]
    fn test_stale_advance_during_fade_is_dropped_then_replaced() {
        let mut carousel = started(3, true);
        carousel.tick(150);
        assert_eq!(carousel.pending_advance(), Some((1, 50)));

        carousel.go(Direction::Forward);
        // The old countdown expires mid-fade and its selection is dropped
        let events = carousel.tick(60);
        assert_eq!(events, vec![CarouselEvent::TransitionDropped { requested: 1 }]);
        assert_eq!(carousel.pending_advance(), None);

        let events = carousel.tick(40);
        assert_eq!(
            events,
            vec![
                CarouselEvent::TransitionFinished { index: 1 },
                CarouselEvent::AutoplayScheduled { next: 2, after_ms: 200 },
            ]
        );
        assert_eq!(carousel.pending_advance(), Some((2, 200)));
    }

    #[test]
    fn test_fade_overshoot_finishes_once() {
        let mut carousel = started(3, false);
        carousel.select(1);
        let events = carousel.tick(1000);
        assert_eq!(events, vec![CarouselEvent::TransitionFinished { index: 1 }]);
        assert!(carousel.tick(1000).is_empty());
        assert_eq!(carousel.slide_style(1), SlideStyle::new(true, 1.0, true));
    }

    #[test]
    fn test_tabs_follow_their_ids() {
        let tabs = TabBar::new(["slide2", "slide0", "slide1"].map(String::from).to_vec());
        let mut carousel = Carousel::with_tabs(tabs, 3, config(false));
        carousel.tick(50);
        carousel.tick(100);
        assert_eq!(carousel.tabs().selected_tab(), Some(1));

        let events = carousel.click_tab(0);
        assert_eq!(events, vec![CarouselEvent::TransitionStarted { from: 0, to: 2 }]);
        assert_eq!(carousel.tabs().selected_tab(), Some(0));
        carousel.tick(100);

        carousel.select_tab_id("slide1");
        carousel.tick(100);
        assert_eq!(carousel.current(), 1);
        assert_eq!(carousel.tabs().selected_tab(), Some(2));

        assert!(carousel.click_tab(7).is_empty());
    }

    #[test]
    fn test_empty_carousel() {
        let mut carousel = Carousel::new(0, config(true));
        let events = carousel.tick(50);
        assert_eq!(events, vec![CarouselEvent::Started]);
        assert!(!carousel.is_animating());
        assert_eq!(carousel.calc_next(Direction::Forward), 0);
        assert!(carousel.go(Direction::Forward).is_empty());
        assert!(carousel.start_autoplay().is_empty());
        assert!(carousel.slide_styles().is_empty());
    }
}
