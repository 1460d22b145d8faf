//! # tab-carousel
//!
//! Tab-navigated content carousel with fade transitions and optional autoplay.
//!
//! This crate provides platform-agnostic logic for:
//! - Resolving carousel options, with silent fallback to defaults
//! - Sequencing slide changes so that only one fade runs at a time
//! - Driving autoplay and the deferred first slide from elapsed time
//! - Computing per-slide styles (visibility, opacity, active marker)
//! - Binding all of the above to page elements (with optional web support)
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for option and config types
//! - `toml` - Read options from a TOML document
//! - `web` - Enable web/WASM DOM bindings and the JS `Carousel` class
//!
//! ## Example
//!
//! ```rust
//! use tab_carousel::{Carousel, CarouselOptions, CarouselState};
//!
//! let config = CarouselOptions {
//!     speed: Some(500),
//!     autoplay: Some(true),
//!     ..Default::default()
//! }
//! .resolve("tourCarousel");
//!
//! let mut carousel = Carousel::new(4, config);
//!
//! // Call tick from your timer with the elapsed milliseconds
//! carousel.tick(16);
//! assert_eq!(carousel.state(), CarouselState::Animating);
//!
//! // A user click on a tab stops autoplay
//! carousel.click_tab(2);
//! assert!(!carousel.is_autoplay());
//! ```

mod carousel;
mod config;
mod fade;
pub mod render;
mod tabs;
mod timer;

#[cfg(feature = "web")]
pub mod web;

pub use carousel::{Carousel, CarouselEvent, CarouselState, Direction};
pub use config::{millis_from_f64, CarouselConfig, CarouselOptions};
pub use fade::{Easing, Fade};
pub use render::{SlideStyle, StyleCache};
pub use tabs::{slide_index_from_tab_id, TabBar};
pub use timer::Countdown;

#[cfg(feature = "web")]
pub use web::{WebCarousel, WebError};
