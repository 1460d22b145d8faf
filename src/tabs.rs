//! Selection model for the carousel's navigation tabs.

/// Number of leading characters stripped from a tab id before the slide
/// number is read (the `slide` in `slide3`).
const TAB_ID_PREFIX_LEN: usize = 5;

/// Read the slide index encoded in a tab id.
///
/// The first five characters are skipped and the leading decimal digits
/// that follow are parsed. Trailing text is ignored.
///
/// ```rust
/// use tab_carousel::slide_index_from_tab_id;
///
/// assert_eq!(slide_index_from_tab_id("slide3"), Some(3));
/// assert_eq!(slide_index_from_tab_id("slide12-tab"), Some(12));
/// assert_eq!(slide_index_from_tab_id("slide"), None);
/// ```
pub fn slide_index_from_tab_id(id: &str) -> Option<usize> {
    let rest: String = id.chars().skip(TAB_ID_PREFIX_LEN).collect();
    let digits: String = rest
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Tab bar state: the tab ids, the slide each tab points at, and which
/// slide is selected.
///
/// A tab points at the slide named by its id (see
/// [`slide_index_from_tab_id`]), or at its own position when the id names
/// none. Selection is tracked by slide. Re-selecting the selected slide
/// does nothing, the same as a native tab strip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabBar {
    ids: Vec<String>,
    slides: Vec<usize>,
    selected: Option<usize>,
}

impl TabBar {
    /// Create a tab bar from existing tab ids. Nothing is selected.
    pub fn new(ids: Vec<String>) -> Self {
        let slides = ids
            .iter()
            .enumerate()
            .map(|(position, id)| slide_index_from_tab_id(id).unwrap_or(position))
            .collect();
        Self {
            ids,
            slides,
            selected: None,
        }
    }

    /// Create a tab bar with `count` tabs named `slide0`, `slide1`, ...
    pub fn with_count(count: usize) -> Self {
        Self::new((0..count).map(|i| format!("slide{i}")).collect())
    }

    /// Select `slide`.
    ///
    /// Returns `Some(slide)` when the selection changed, `None` when that
    /// slide was already selected.
    pub fn select(&mut self, slide: usize) -> Option<usize> {
        if self.selected == Some(slide) {
            return None;
        }
        self.selected = Some(slide);
        Some(slide)
    }

    /// Selected slide.
    #[inline]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Position of the tab pointing at the selected slide.
    pub fn selected_tab(&self) -> Option<usize> {
        self.selected.and_then(|slide| self.tab_for_slide(slide))
    }

    /// Slide the tab at `position` points at.
    pub fn slide_for_tab(&self, position: usize) -> Option<usize> {
        self.slides.get(position).copied()
    }

    /// Position of the first tab pointing at `slide`.
    pub fn tab_for_slide(&self, slide: usize) -> Option<usize> {
        self.slides.iter().position(|&s| s == slide)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id of the tab at `position`.
    pub fn id(&self, position: usize) -> Option<&str> {
        self.ids.get(position).map(String::as_str)
    }

    /// Position of the tab with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|t| t == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
