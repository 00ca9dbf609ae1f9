use crate::gfx::Color;
use crate::input::KeyCode;
use crate::math::{UVec2, uvec2};

/// Application settings, fixed once the loop starts
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub size: UVec2,
    pub max_fps: Option<u8>,
    pub clear_color: Color,
    pub exit_key: Option<KeyCode>,
    pub persist: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "FieldKit".to_string(),
            size: uvec2(800, 600),
            max_fps: Some(60),
            clear_color: Color::BLACK,
            exit_key: Some(KeyCode::KeyQ),
            persist: false,
        }
    }
}

impl AppConfig {
    /// Set the app's title
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the drawable area size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = uvec2(width, height);
        self
    }

    /// Limits the maximum fps
    pub fn max_fps(mut self, fps: u8) -> Self {
        self.max_fps = Some(fps);
        self
    }

    /// Runs the loop as fast as possible
    pub fn unlimited_fps(mut self) -> Self {
        self.max_fps = None;
        self
    }

    /// Color used to clear the frame before drawing
    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Key that closes the app when pressed, `None` to disable it
    pub fn exit_key(mut self, key: Option<KeyCode>) -> Self {
        self.exit_key = key;
        self
    }

    /// Restore widgets before the first frame and persist them after the last one
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.size, uvec2(800, 600));
        assert_eq!(config.max_fps, Some(60));
        assert_eq!(config.clear_color, Color::BLACK);
        assert_eq!(config.exit_key, Some(KeyCode::KeyQ));
        assert!(!config.persist);
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::default()
            .title("Fields")
            .size(320, 240)
            .unlimited_fps()
            .exit_key(None)
            .persist(true);

        assert_eq!(config.title, "Fields");
        assert_eq!(config.size, uvec2(320, 240));
        assert_eq!(config.max_fps, None);
        assert_eq!(config.exit_key, None);
        assert!(config.persist);
    }
}
