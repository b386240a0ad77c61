//! Press/release input source selection
//!
//! The device class is detected once at startup; afterwards only the two
//! event names matter.

/// Which DOM events carry press and release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputScheme {
    #[default]
    Pointer,
    Touch,
}

impl InputScheme {
    pub fn from_touch_support(has_touch: bool) -> Self {
        if has_touch {
            InputScheme::Touch
        } else {
            InputScheme::Pointer
        }
    }

    /// Detect touch support via `"ontouchstart" in window`
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        let has_touch = web_sys::window()
            .map(|w| js_sys::Reflect::has(&w, &"ontouchstart".into()).unwrap_or(false))
            .unwrap_or(false);
        let scheme = Self::from_touch_support(has_touch);
        log::info!("Input scheme: {:?}", scheme);
        scheme
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::Pointer
    }

    pub fn press_event(&self) -> &'static str {
        match self {
            InputScheme::Pointer => "mousedown",
            InputScheme::Touch => "touchstart",
        }
    }

    pub fn release_event(&self) -> &'static str {
        match self {
            InputScheme::Pointer => "mouseup",
            InputScheme::Touch => "touchend",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let touch = InputScheme::from_touch_support(true);
        assert_eq!(touch, InputScheme::Touch);
        assert_eq!(touch.press_event(), "touchstart");
        assert_eq!(touch.release_event(), "touchend");

        let pointer = InputScheme::from_touch_support(false);
        assert_eq!(pointer.press_event(), "mousedown");
        assert_eq!(pointer.release_event(), "mouseup");
    }

    #[test]
    fn test_native_detects_pointer() {
        assert_eq!(InputScheme::detect(), InputScheme::Pointer);
    }
}
