//! Fade transitions between two slides.

/// Acceleration curve applied to fade progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// Constant rate
    #[default]
    Linear,
    /// Starts slow, finishes fast
    EaseIn,
    /// Starts fast, finishes slow
    EaseOut,
    /// Slow at both ends
    InAndOut,
}

impl Easing {
    /// Look up an easing curve by name.
    ///
    /// Case, dashes and underscores are ignored, so `"ease-out"`,
    /// `"ease_out"` and `"easeOut"` all name the same curve.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "linear" => Some(Easing::Linear),
            "easein" | "in" => Some(Easing::EaseIn),
            "easeout" | "out" => Some(Easing::EaseOut),
            "inandout" | "easeinout" | "inout" => Some(Easing::InAndOut),
            _ => None,
        }
    }

    /// Map linear progress `t` in 0.0-1.0 onto this curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::InAndOut => 3.0 * t * t - 2.0 * t * t * t,
        }
    }
}

/// A slide change in flight.
///
/// When the target is the slide already shown there is no outgoing slide
/// and only the fade-in runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Fade {
    outgoing: Option<usize>,
    incoming: usize,
    speed_ms: u32,
    elapsed_ms: u32,
    easing: Easing,
    done: bool,
}

impl Fade {
    /// Fade `outgoing` out while `incoming` fades in.
    pub fn cross(outgoing: usize, incoming: usize, speed_ms: u32, easing: Easing) -> Self {
        Self {
            outgoing: Some(outgoing),
            incoming,
            speed_ms,
            elapsed_ms: 0,
            easing,
            done: false,
        }
    }

    /// Fade `incoming` in with nothing fading out.
    pub fn show(incoming: usize, speed_ms: u32, easing: Easing) -> Self {
        Self {
            outgoing: None,
            incoming,
            speed_ms,
            elapsed_ms: 0,
            easing,
            done: false,
        }
    }

    #[inline]
    pub fn outgoing(&self) -> Option<usize> {
        self.outgoing
    }

    #[inline]
    pub fn incoming(&self) -> usize {
        self.incoming
    }

    #[inline]
    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    /// Linear progress in 0.0-1.0.
    pub fn progress(&self) -> f64 {
        if self.speed_ms == 0 {
            return if self.done { 1.0 } else { 0.0 };
        }
        (self.elapsed_ms as f64 / self.speed_ms as f64).min(1.0)
    }

    /// Opacity of the incoming slide.
    pub fn incoming_opacity(&self) -> f64 {
        self.easing.apply(self.progress())
    }

    /// Opacity of the outgoing slide, 0.0 when there is none.
    pub fn outgoing_opacity(&self) -> f64 {
        match self.outgoing {
            Some(_) => 1.0 - self.easing.apply(self.progress()),
            None => 0.0,
        }
    }

    /// Advance by `elapsed_ms`. Returns true once the fade is complete.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms).min(self.speed_ms);
        if self.elapsed_ms >= self.speed_ms {
            self.done = true;
        }
        self.done
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::InAndOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!((Easing::InAndOut.apply(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn easing_names() {
        assert_eq!(Easing::from_name("easeOut"), Some(Easing::EaseOut));
        assert_eq!(Easing::from_name("EASE-IN"), Some(Easing::EaseIn));
        assert_eq!(Easing::from_name("in_and_out"), Some(Easing::InAndOut));
        assert_eq!(Easing::from_name("bounce"), None);
    }

    #[test]
    fn cross_fade_progress() {
        let mut fade = Fade::cross(0, 1, 100, Easing::Linear);
        assert_eq!(fade.incoming_opacity(), 0.0);
        assert_eq!(fade.outgoing_opacity(), 1.0);

        assert!(!fade.advance(25));
        assert!((fade.incoming_opacity() - 0.25).abs() < 1e-9);
        assert!((fade.outgoing_opacity() - 0.75).abs() < 1e-9);

        assert!(fade.advance(100));
        assert_eq!(fade.progress(), 1.0);
        assert_eq!(fade.outgoing_opacity(), 0.0);
    }

    #[test]
    fn show_only_has_no_outgoing() {
        let mut fade = Fade::show(2, 50, Easing::Linear);
        assert_eq!(fade.outgoing(), None);
        assert_eq!(fade.outgoing_opacity(), 0.0);
        assert!(fade.advance(50));
        assert_eq!(fade.incoming_opacity(), 1.0);
    }

    #[test]
    fn zero_speed_completes_on_first_advance() {
        let mut fade = Fade::cross(0, 1, 0, Easing::EaseIn);
        assert_eq!(fade.progress(), 0.0);
        assert!(fade.advance(0));
        assert_eq!(fade.incoming_opacity(), 1.0);
        assert_eq!(fade.outgoing_opacity(), 0.0);
    }
}
