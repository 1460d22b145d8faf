//! Carousel options and their resolution into a working configuration.

use crate::fade::Easing;

/// Default time in milliseconds a slide change takes.
pub const DEFAULT_SPEED_MS: u32 = 750;
/// Default time in milliseconds autoplay waits on a slide.
pub const DEFAULT_DURATION_MS: u32 = 8000;
/// Default time in milliseconds before the first slide is shown.
pub const DEFAULT_DELAY_MS: u32 = 0;
/// Default class carried by slide elements.
pub const DEFAULT_SLIDE_CLASS: &str = "slide";
/// Default class carried by navigation tab elements.
pub const DEFAULT_TAB_CLASS: &str = "carousel-tab";

/// Raw carousel options.
///
/// Every field is optional. Missing or unusable values fall back to the
/// defaults when resolved with [`CarouselOptions::resolve`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarouselOptions {
    pub speed: Option<u32>,
    pub autoplay: Option<bool>,
    pub duration: Option<u32>,
    pub delay: Option<u32>,
    pub slide_height: Option<u32>,
    pub easing: Option<String>,
    pub nav_id: Option<String>,
    pub content_id: Option<String>,
    pub slide_class: Option<String>,
    pub tab_class: Option<String>,
}

impl CarouselOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document into `CarouselOptions`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Read options from string attributes, such as an element's `data-*` set.
    ///
    /// Names may carry a `data-` prefix and use either `kebab-case` or
    /// `camelCase`. Values that do not parse are skipped, which leaves the
    /// option unset so it resolves to its default.
    ///
    /// ```rust
    /// use tab_carousel::CarouselOptions;
    ///
    /// let opts = CarouselOptions::from_attributes([
    ///     ("data-speed", "300"),
    ///     ("data-autoplay", "true"),
    ///     ("data-duration", "soon"),
    /// ]);
    /// assert_eq!(opts.speed, Some(300));
    /// assert_eq!(opts.autoplay, Some(true));
    /// assert_eq!(opts.duration, None);
    /// ```
    pub fn from_attributes<I, K, V>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for (name, value) in attrs {
            let name = name.as_ref();
            let value = value.as_ref().trim();
            let key = name.strip_prefix("data-").unwrap_or(name);
            match normalize_key(key).as_str() {
                "speed" => opts.speed = parse_ms(value).or(opts.speed),
                "autoplay" => opts.autoplay = parse_flag(value).or(opts.autoplay),
                "duration" => opts.duration = parse_ms(value).or(opts.duration),
                "delay" => opts.delay = parse_ms(value).or(opts.delay),
                "slideheight" => opts.slide_height = parse_ms(value).or(opts.slide_height),
                "easing" => opts.easing = Some(value.to_string()),
                "navid" | "nav" => opts.nav_id = non_empty(value),
                "contentid" | "content" => opts.content_id = non_empty(value),
                "slideclass" => opts.slide_class = non_empty(value),
                "tabclass" => opts.tab_class = non_empty(value),
                _ => log::trace!("ignoring unknown carousel attribute {name}"),
            }
        }
        opts
    }

    /// Resolve these options into a configuration for `container_id`.
    ///
    /// This never fails: a zero speed, a missing duration or an unknown
    /// easing name all resolve to their defaults. A zero duration is kept.
    pub fn resolve(&self, container_id: &str) -> CarouselConfig {
        let easing = match self.easing.as_deref() {
            Some(name) => Easing::from_name(name).unwrap_or_else(|| {
                log::debug!("unknown easing {name:?}, using linear");
                Easing::default()
            }),
            None => Easing::default(),
        };

        CarouselConfig {
            container_id: container_id.to_string(),
            speed_ms: self.speed.filter(|&s| s > 0).unwrap_or(DEFAULT_SPEED_MS),
            autoplay: self.autoplay.unwrap_or(false),
            duration_ms: self.duration.unwrap_or(DEFAULT_DURATION_MS),
            delay_ms: self.delay.unwrap_or(DEFAULT_DELAY_MS),
            slide_height: self.slide_height,
            easing,
            nav_id: self
                .nav_id
                .clone()
                .unwrap_or_else(|| format!("{container_id}Nav")),
            content_id: self
                .content_id
                .clone()
                .unwrap_or_else(|| format!("{container_id}_content")),
            slide_class: self
                .slide_class
                .clone()
                .unwrap_or_else(|| DEFAULT_SLIDE_CLASS.to_string()),
            tab_class: self
                .tab_class
                .clone()
                .unwrap_or_else(|| DEFAULT_TAB_CLASS.to_string()),
        }
    }
}

/// Resolved carousel configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarouselConfig {
    /// Id of the carousel container element
    pub container_id: String,
    /// How long a slide change takes
    pub speed_ms: u32,
    /// Whether slides advance by themselves
    pub autoplay: bool,
    /// How long autoplay waits before the next slide
    pub duration_ms: u32,
    /// How long to wait before the first slide is shown
    pub delay_ms: u32,
    /// Height in pixels of the slide container, if it should be set
    pub slide_height: Option<u32>,
    /// Fade curve
    pub easing: Easing,
    /// Id of the navigation element holding the tabs
    pub nav_id: String,
    /// Id of the element holding the slides
    pub content_id: String,
    pub slide_class: String,
    pub tab_class: String,
}

impl CarouselConfig {
    /// Configuration with every option at its default.
    pub fn new(container_id: &str) -> Self {
        CarouselOptions::default().resolve(container_id)
    }
}

/// Convert a loosely typed millisecond value, such as a JS number, into
/// milliseconds. `NaN`, infinities, negatives and values past `u32::MAX`
/// give `None`.
pub fn millis_from_f64(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0 && value <= u32::MAX as f64).then(|| value as u32)
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn parse_ms(value: &str) -> Option<u32> {
    value.parse::<u32>().ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
