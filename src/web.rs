//! Browser bindings: drives a [`Carousel`] from DOM elements and timers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent, Window};

use crate::config::{millis_from_f64, CarouselOptions};
use crate::render::web::{
    apply_height, apply_initial_style, apply_slide_style, apply_tab_selection, decorate_tab,
};
use crate::render::StyleCache;
use crate::tabs::TabBar;
use crate::{Carousel, CarouselEvent};

/// Interval between animation ticks in milliseconds.
const TICK_INTERVAL_MS: i32 = 16;

/// Error raised while wiring a carousel to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// No global `window`
    NoWindow,
    /// The window has no document
    NoDocument,
    /// No element with the given id
    MissingElement { id: String },
    /// A DOM call failed
    Dom(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::NoWindow => write!(f, "No window available"),
            WebError::NoDocument => write!(f, "No document available"),
            WebError::MissingElement { id } => write!(f, "No element with id '{}'", id),
            WebError::Dom(msg) => write!(f, "DOM error: {}", msg),
        }
    }
}

impl std::error::Error for WebError {}

impl From<String> for WebError {
    fn from(msg: String) -> Self {
        WebError::Dom(msg)
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// State shared between the timer and the click handlers.
struct Shared {
    carousel: Carousel,
    slides: Vec<HtmlElement>,
    tabs: Vec<Element>,
    cache: StyleCache,
    selected_tab: Option<usize>,
    last_tick: f64,
}

impl Shared {
    fn step(&mut self, now: f64) {
        let elapsed = millis_from_f64(now - self.last_tick).unwrap_or(0);
        self.last_tick = now;
        let events = self.carousel.tick(elapsed);
        self.apply(&events);
    }

    fn apply(&mut self, events: &[CarouselEvent]) {
        for event in events {
            log::trace!("{}: {:?}", self.carousel.config().container_id, event);
        }
        if let Err(err) = self.draw() {
            log::warn!("carousel {}: {}", self.carousel.config().container_id, err);
        }
    }

    fn draw(&mut self) -> Result<(), String> {
        let styles = self.carousel.slide_styles();
        for (index, style) in self.cache.update(&styles) {
            if let Some(slide) = self.slides.get(index) {
                apply_slide_style(slide, &style)?;
            }
        }

        let selected = self.carousel.tabs().selected_tab();
        if selected != self.selected_tab {
            apply_tab_selection(&self.tabs, selected, &self.carousel.config().tab_class)?;
            self.selected_tab = selected;
        }
        Ok(())
    }
}

type ClickHandler = Closure<dyn FnMut(MouseEvent)>;

/// A carousel attached to page elements.
///
/// Dropping the handle stops the timer and unbinds the tab listeners.
pub struct WebCarousel {
    shared: Rc<RefCell<Shared>>,
    window: Window,
    interval: i32,
    _tick: Closure<dyn FnMut()>,
    clicks: Vec<(Element, ClickHandler)>,
}

impl WebCarousel {
    /// Attach a carousel to the container with id `container_id`.
    ///
    /// Slides are the `div` elements with the slide class inside the
    /// container. Tabs are the children of the navigation element (only the
    /// ones already carrying the tab class, if any do). A click on a tab
    /// opens the slide its id names, or the slide at its position.
    pub fn new(container_id: &str, options: &CarouselOptions) -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let config = options.resolve(container_id);

        match (document.get_element_by_id(&config.content_id), config.slide_height) {
            (Some(content), Some(height)) => {
                let content = content
                    .dyn_into::<HtmlElement>()
                    .map_err(|_| WebError::Dom("content is not an HTML element".into()))?;
                apply_height(&content, height)?;
            }
            (None, _) => log::warn!("no slide content element '{}'", config.content_id),
            _ => {}
        }

        let slides = find_slides(&document, container_id, &config.slide_class)?;
        for slide in &slides {
            apply_initial_style(slide)?;
        }

        let tabs = match document.get_element_by_id(&config.nav_id) {
            Some(nav) => decorate_tabs(&nav, &config.tab_class)?,
            None => {
                log::warn!("no navigation element '{}'", config.nav_id);
                Vec::new()
            }
        };
        // Without a navigation bar the slides are still driven by index.
        let tab_bar = if tabs.is_empty() {
            TabBar::with_count(slides.len())
        } else {
            TabBar::new(tabs.iter().map(Element::id).collect())
        };

        log::debug!(
            "carousel {} attached: {} slides, {} tabs",
            container_id,
            slides.len(),
            tabs.len()
        );

        let slide_count = slides.len();
        let shared = Rc::new(RefCell::new(Shared {
            carousel: Carousel::with_tabs(tab_bar, slide_count, config),
            cache: StyleCache::with_slide_count(slide_count),
            slides,
            tabs: tabs.clone(),
            selected_tab: None,
            last_tick: js_sys::Date::now(),
        }));

        let mut clicks = Vec::with_capacity(tabs.len());
        for (position, tab) in tabs.into_iter().enumerate() {
            let state = Rc::clone(&shared);
            let handler: ClickHandler = Closure::new(move |_event: MouseEvent| {
                let mut state = state.borrow_mut();
                let events = state.carousel.click_tab(position);
                state.apply(&events);
            });
            tab.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
                .map_err(|_| WebError::Dom("failed to bind tab click".into()))?;
            clicks.push((tab, handler));
        }

        let state = Rc::clone(&shared);
        let tick: Closure<dyn FnMut()> = Closure::new(move || {
            state.borrow_mut().step(js_sys::Date::now());
        });
        let interval = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                TICK_INTERVAL_MS,
            )
            .map_err(|_| WebError::Dom("failed to start timer".into()))?;

        Ok(Self {
            shared,
            window,
            interval,
            _tick: tick,
            clicks,
        })
    }

    /// Attach a carousel configured from the container's attributes.
    ///
    /// See [`CarouselOptions::from_attributes`] for the recognised names.
    pub fn from_element(container_id: &str) -> Result<Self, WebError> {
        let document = web_sys::window()
            .ok_or(WebError::NoWindow)?
            .document()
            .ok_or(WebError::NoDocument)?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| WebError::MissingElement {
                id: container_id.to_string(),
            })?;

        let attrs: Vec<(String, String)> = container
            .get_attribute_names()
            .iter()
            .filter_map(|name| name.as_string())
            .filter_map(|name| container.get_attribute(&name).map(|value| (name, value)))
            .collect();
        Self::new(container_id, &CarouselOptions::from_attributes(attrs))
    }

    /// Turn autoplay on and move to the next slide.
    pub fn start_autoplay(&self) {
        let mut state = self.shared.borrow_mut();
        let events = state.carousel.start_autoplay();
        state.apply(&events);
    }

    /// Turn autoplay off.
    pub fn stop_autoplay(&self) {
        let mut state = self.shared.borrow_mut();
        let events = state.carousel.stop_autoplay();
        state.apply(&events);
    }

    /// Move to the next slide, wrapping at the end.
    pub fn next(&self) {
        self.go(crate::Direction::Forward);
    }

    /// Move to the previous slide, wrapping at the start.
    pub fn previous(&self) {
        self.go(crate::Direction::Previous);
    }

    fn go(&self, direction: crate::Direction) {
        let mut state = self.shared.borrow_mut();
        let events = state.carousel.go(direction);
        state.apply(&events);
    }

    /// Index of the slide currently shown.
    pub fn current(&self) -> usize {
        self.shared.borrow().carousel.current()
    }

    pub fn is_autoplay(&self) -> bool {
        self.shared.borrow().carousel.is_autoplay()
    }
}

impl Drop for WebCarousel {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.interval);
        for (tab, handler) in &self.clicks {
            let _ = tab
                .remove_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        }
    }
}

fn find_slides(
    document: &Document,
    container_id: &str,
    slide_class: &str,
) -> Result<Vec<HtmlElement>, WebError> {
    let selector = format!("#{} div.{}", container_id, slide_class);
    let nodes = document
        .query_selector_all(&selector)
        .map_err(|_| WebError::Dom(format!("invalid selector '{}'", selector)))?;

    let mut slides = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            slides.push(el);
        }
    }
    Ok(slides)
}

/// Collect the navigation tabs.
///
/// Children already carrying the tab class are the tabs. Without any, every
/// child becomes one. Tabs without an id get `slide<N>` by tab order, so
/// their id names the slide they open.
fn decorate_tabs(nav: &Element, tab_class: &str) -> Result<Vec<Element>, WebError> {
    let children = nav.children();
    let all: Vec<Element> = (0..children.length())
        .filter_map(|i| children.item(i))
        .collect();
    let marked: Vec<Element> = all
        .iter()
        .filter(|el| el.class_list().contains(tab_class))
        .cloned()
        .collect();
    let tabs = if marked.is_empty() { all } else { marked };

    for (position, tab) in tabs.iter().enumerate() {
        if tab.id().is_empty() {
            tab.set_id(&format!("slide{}", position));
        }
        decorate_tab(tab, tab_class)?;
    }
    Ok(tabs)
}

/// JavaScript-facing carousel.
///
/// ```js
/// const carousel = new Carousel("tourCarousel", 500, true, 6000, 200, 320);
/// carousel.stopAutoplay();
/// ```
#[wasm_bindgen(js_name = Carousel)]
pub struct JsCarousel {
    inner: WebCarousel,
}

#[wasm_bindgen(js_class = Carousel)]
impl JsCarousel {
    /// All arguments except `carousel` are optional. Missing or non-numeric
    /// values use the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        carousel: &str,
        speed: Option<f64>,
        autoplay: Option<bool>,
        duration: Option<f64>,
        delay: Option<f64>,
        slide_height: Option<f64>,
    ) -> Result<JsCarousel, JsValue> {
        let options = CarouselOptions {
            speed: speed.and_then(millis_from_f64),
            autoplay,
            duration: duration.and_then(millis_from_f64),
            delay: delay.and_then(millis_from_f64),
            slide_height: slide_height.and_then(millis_from_f64),
            ..Default::default()
        };
        let inner = WebCarousel::new(carousel, &options)?;
        Ok(JsCarousel { inner })
    }

    /// Build a carousel from the container's `data-*` attributes.
    #[wasm_bindgen(js_name = fromElement)]
    pub fn from_element(carousel: &str) -> Result<JsCarousel, JsValue> {
        let inner = WebCarousel::from_element(carousel)?;
        Ok(JsCarousel { inner })
    }

    #[wasm_bindgen(js_name = startAutoplay)]
    pub fn start_autoplay(&self) {
        self.inner.start_autoplay();
    }

    #[wasm_bindgen(js_name = stopAutoplay)]
    pub fn stop_autoplay(&self) {
        self.inner.stop_autoplay();
    }

    pub fn next(&self) {
        self.inner.next();
    }

    pub fn previous(&self) {
        self.inner.previous();
    }

    pub fn current(&self) -> usize {
        self.inner.current()
    }

    #[wasm_bindgen(getter)]
    pub fn autoplay(&self) -> bool {
        self.inner.is_autoplay()
    }
}
