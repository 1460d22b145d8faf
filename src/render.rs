//! Slide styling derived from the sequencer state.

use crate::Carousel;

/// Class carried by the slide the carousel last moved to.
pub const ACTIVE_SLIDE_CLASS: &str = "activeSlide";

/// Inline style every slide receives when the carousel is set up.
///
/// Slides are stacked on top of each other and hidden so that fades can
/// overlap them.
pub const INITIAL_SLIDE_STYLE: &[(&str, &str)] = &[
    ("display", "none"),
    ("opacity", "0"),
    ("float", "none"),
    ("top", "0px"),
    ("left", "0px"),
    ("position", "absolute"),
];

/// How one slide should look at a given moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideStyle {
    /// Whether the slide is displayed at all
    pub visible: bool,
    /// Opacity (0.0 - 1.0)
    pub opacity: f64,
    /// Whether the slide carries the active class
    pub active: bool,
}

impl SlideStyle {
    pub fn new(visible: bool, opacity: f64, active: bool) -> Self {
        Self {
            visible,
            opacity: opacity.clamp(0.0, 1.0),
            active,
        }
    }

    /// Value for the CSS `display` property.
    ///
    /// Visible slides get an empty value so the stylesheet decides.
    pub fn css_display(&self) -> &'static str {
        if self.visible {
            ""
        } else {
            "none"
        }
    }

    /// Value for the CSS `opacity` property, rounded to three decimals.
    pub fn css_opacity(&self) -> String {
        let rounded = (self.opacity * 1000.0).round() / 1000.0;
        format!("{rounded}")
    }
}

impl Default for SlideStyle {
    fn default() -> Self {
        Self::new(false, 0.0, false)
    }
}

/// Compute the style of every slide.
///
/// ## Example
///
/// ```rust
/// use tab_carousel::{Carousel, CarouselConfig};
///
/// let mut carousel = Carousel::new(2, CarouselConfig::new("tour"));
/// let styles = tab_carousel::render::render_slides(&carousel);
/// assert!(styles.iter().all(|s| !s.visible));
///
/// carousel.tick(0);
/// carousel.tick(750);
/// let styles = tab_carousel::render::render_slides(&carousel);
/// assert!(styles[0].visible && styles[0].active);
/// assert_eq!(styles[0].css_opacity(), "1");
/// ```
pub fn render_slides(carousel: &Carousel) -> Vec<SlideStyle> {
    carousel.slide_styles()
}

/// Remembers the last styles written out so only changes are applied.
#[derive(Clone, Debug, Default)]
pub struct StyleCache {
    applied: Vec<Option<SlideStyle>>,
}

impl StyleCache {
    /// Create an empty cache sized for `slide_count` entries.
    pub fn with_slide_count(slide_count: usize) -> Self {
        Self {
            applied: vec![None; slide_count],
        }
    }

    /// Record `styles` and return the entries that differ from the last
    /// recorded ones.
    pub fn update(&mut self, styles: &[SlideStyle]) -> Vec<(usize, SlideStyle)> {
        if self.applied.len() != styles.len() {
            self.applied.resize(styles.len(), None);
        }
        let mut changed = Vec::new();
        for (index, style) in styles.iter().enumerate() {
            if self.applied[index].as_ref() != Some(style) {
                self.applied[index] = Some(*style);
                changed.push((index, *style));
            }
        }
        changed
    }

    /// Forget everything so the next update reports every slide.
    pub fn clear(&mut self) {
        for entry in &mut self.applied {
            *entry = None;
        }
    }
}

/// DOM output for slide and tab styles.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use web_sys::{Element, HtmlElement};

    fn set_property(el: &HtmlElement, name: &str, value: &str) -> Result<(), String> {
        el.style()
            .set_property(name, value)
            .map_err(|_| format!("Failed to set style {name}"))
    }

    /// Give a slide its initial stacked, hidden style.
    pub fn apply_initial_style(el: &HtmlElement) -> Result<(), String> {
        for (name, value) in INITIAL_SLIDE_STYLE {
            set_property(el, name, value)?;
        }
        Ok(())
    }

    /// Set the pixel height of the slide container.
    pub fn apply_height(el: &HtmlElement, height: u32) -> Result<(), String> {
        set_property(el, "height", &format!("{height}px"))
    }

    /// Write a computed style onto a slide element.
    pub fn apply_slide_style(el: &HtmlElement, style: &SlideStyle) -> Result<(), String> {
        set_property(el, "display", style.css_display())?;
        set_property(el, "opacity", &style.css_opacity())?;
        el.class_list()
            .toggle_with_force(ACTIVE_SLIDE_CLASS, style.active)
            .map_err(|_| "Failed to toggle active class")?;
        Ok(())
    }

    /// Mark a navigation element as a tab.
    pub fn decorate_tab(el: &Element, tab_class: &str) -> Result<(), String> {
        el.class_list()
            .add_1(tab_class)
            .map_err(|_| format!("Failed to add class {tab_class}"))
    }

    /// Highlight the selected tab and clear the others.
    pub fn apply_tab_selection(
        tabs: &[Element],
        selected: Option<usize>,
        tab_class: &str,
    ) -> Result<(), String> {
        let selected_class = format!("{tab_class}-selected");
        for (index, tab) in tabs.iter().enumerate() {
            tab.class_list()
                .toggle_with_force(&selected_class, selected == Some(index))
                .map_err(|_| format!("Failed to toggle {selected_class}"))?;
        }
        Ok(())
    }
}
