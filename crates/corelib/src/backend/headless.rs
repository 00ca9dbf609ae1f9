use std::collections::VecDeque;

use super::Backend;
use crate::events::Event;
use crate::gfx::Bitmap;
use crate::math::{UVec2, Vec2, uvec2};

/// Scripted input, one list of events per frame
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputScript {
    pub frames: Vec<Vec<Event>>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame with the given events
    pub fn frame(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.frames.push(events.into_iter().collect());
        self
    }

    /// Appends `count` frames without events
    pub fn idle(mut self, count: usize) -> Self {
        self.frames
            .extend(std::iter::repeat_with(Vec::new).take(count));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid input script: {e}"))
    }

    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read input script '{}': {e}", path.display()))?;
        let script = Self::from_json(&json)?;
        log::debug!(
            "Input script '{}' loaded with {} frames",
            path.display(),
            script.len()
        );
        Ok(script)
    }
}

/// Backend without window, feeds frames from an `InputScript`
/// and keeps the last presented frame in memory
#[derive(Debug)]
pub struct HeadlessBackend {
    size: UVec2,
    frames: VecDeque<Vec<Event>>,
    pointer: Vec2,
    quit_when_done: bool,
    last_frame: Option<Bitmap>,
    frames_presented: u64,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: uvec2(width, height),
            frames: VecDeque::new(),
            pointer: Vec2::ZERO,
            quit_when_done: true,
            last_frame: None,
            frames_presented: 0,
        }
    }

    /// Queue the script frames after the pending ones
    pub fn with_script(mut self, script: InputScript) -> Self {
        self.push_script(script);
        self
    }

    /// Emit `Event::Quit` once the script is exhausted (enabled by default)
    pub fn quit_when_done(mut self, value: bool) -> Self {
        self.quit_when_done = value;
        self
    }

    pub fn push_script(&mut self, script: InputScript) {
        self.frames.extend(script.frames);
    }

    pub fn push_frame(&mut self, events: impl IntoIterator<Item = Event>) {
        self.frames.push_back(events.into_iter().collect());
    }

    /// Frames not yet polled
    #[inline]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn last_frame(&self) -> Option<&Bitmap> {
        self.last_frame.as_ref()
    }

    #[inline]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Writes the last presented frame as a PNG file
    pub fn save_screenshot<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), String> {
        self.last_frame
            .as_ref()
            .ok_or_else(|| "No frame has been presented yet".to_string())?
            .save_png(path)
    }
}

impl Backend for HeadlessBackend {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn poll_events(&mut self, out: &mut Vec<Event>) {
        out.clear();

        match self.frames.pop_front() {
            Some(events) => {
                if let Some(pos) = events.iter().rev().find_map(Event::pointer_position) {
                    self.pointer = pos;
                }
                out.extend(events);
            }
            None if self.quit_when_done => out.push(Event::Quit),
            None => {}
        }
    }

    fn mouse_position(&self) -> Vec2 {
        self.pointer
    }

    fn present(&mut self, frame: &Bitmap) -> Result<(), String> {
        if frame.size() != self.size {
            return Err(format!(
                "Frame size {:?} doesn't match the backend size {:?}",
                frame.size(),
                self.size
            ));
        }

        match &mut self.last_frame {
            Some(last) => last.clone_from(frame),
            None => self.last_frame = Some(frame.clone()),
        }

        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::Color;
    use crate::input::KeyCode;
    use crate::math::vec2;

    #[test]
    fn test_replays_frames_in_order() {
        let script = InputScript::new()
            .frame([Event::key_down(KeyCode::KeyA)])
            .idle(1)
            .frame([Event::key_down(KeyCode::KeyB)]);
        let mut backend = HeadlessBackend::new(10, 10).with_script(script);

        let mut events = vec![];
        backend.poll_events(&mut events);
        assert_eq!(events, vec![Event::key_down(KeyCode::KeyA)]);

        backend.poll_events(&mut events);
        assert!(events.is_empty());

        backend.poll_events(&mut events);
        assert_eq!(events, vec![Event::key_down(KeyCode::KeyB)]);
        assert_eq!(backend.pending_frames(), 0);
    }

    #[test]
    fn test_quit_when_exhausted() {
        let mut backend = HeadlessBackend::new(10, 10);
        let mut events = vec![];
        backend.poll_events(&mut events);
        assert_eq!(events, vec![Event::Quit]);

        let mut backend = HeadlessBackend::new(10, 10).quit_when_done(false);
        backend.poll_events(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_pointer_follows_last_pointer_event() {
        let mut backend = HeadlessBackend::new(10, 10);
        backend.push_frame([
            Event::MouseMove { pos: vec2(1.0, 1.0) },
            Event::click(vec2(4.0, 5.0)),
            Event::key_down(KeyCode::KeyA),
        ]);
        backend.push_frame([Event::key_down(KeyCode::KeyB)]);

        let mut events = vec![];
        backend.poll_events(&mut events);
        assert_eq!(backend.mouse_position(), vec2(4.0, 5.0));

        // frames without pointer events keep the last position
        backend.poll_events(&mut events);
        assert_eq!(backend.mouse_position(), vec2(4.0, 5.0));
    }

    #[test]
    fn test_present_keeps_last_frame() {
        let mut backend = HeadlessBackend::new(2, 2);
        assert!(backend.last_frame().is_none());
        assert!(backend.save_screenshot("unused.png").is_err());

        let mut frame = Bitmap::new(2, 2);
        frame.fill(Color::RED);
        backend.present(&frame).unwrap();
        frame.fill(Color::BLUE);
        backend.present(&frame).unwrap();

        assert_eq!(backend.frames_presented(), 2);
        assert_eq!(
            backend.last_frame().and_then(|f| f.pixel(1, 1)),
            Some([0, 0, 255, 255])
        );
    }

    #[test]
    fn test_present_rejects_wrong_size() {
        let mut backend = HeadlessBackend::new(2, 2);
        assert!(backend.present(&Bitmap::new(3, 2)).is_err());
        assert_eq!(backend.frames_presented(), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_load_script_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("script.json");
        std::fs::write(
            &path,
            r#"{ "frames": [
                [{ "MouseDown": { "button": "Left", "pos": [150.0, 110.0] } }],
                [{ "KeyDown": { "key": "KeyH", "text": "h" } }, { "KeyDown": { "key": "KeyI", "text": "i" } }],
                []
            ] }"#,
        )
        .unwrap();

        let script = InputScript::load(&path).unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.frames[1][1], Event::typed(KeyCode::KeyI, 'i'));

        assert!(InputScript::load(tmp.path().join("missing.json")).is_err());
        assert!(InputScript::from_json("{ nope").is_err());
    }
}
