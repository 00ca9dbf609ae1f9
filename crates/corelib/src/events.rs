use crate::input::{KeyCode, MouseButton};
use crate::math::Vec2;

/// Discrete input record collected during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// The user or the platform asked to close the app
    Quit,
    MouseMove {
        pos: Vec2,
    },
    MouseDown {
        button: MouseButton,
        pos: Vec2,
    },
    MouseUp {
        button: MouseButton,
        pos: Vec2,
    },
    /// `text` is the character produced by the key, if any
    KeyDown {
        key: KeyCode,
        #[cfg_attr(feature = "serde", serde(default))]
        text: Option<char>,
    },
    KeyUp {
        key: KeyCode,
    },
}

impl Event {
    /// Key down event using the unmodified US layout character of the key
    pub fn key_down(key: KeyCode) -> Self {
        Event::KeyDown {
            key,
            text: key.default_char(),
        }
    }

    /// Key down event producing `c`
    pub fn typed(key: KeyCode, c: char) -> Self {
        Event::KeyDown { key, text: Some(c) }
    }

    /// Left button mouse down
    pub fn click(pos: Vec2) -> Self {
        Event::MouseDown {
            button: MouseButton::Left,
            pos,
        }
    }

    #[inline]
    pub fn is_quit(&self) -> bool {
        matches!(self, Event::Quit)
    }

    #[inline]
    pub fn is_key_down(&self, code: KeyCode) -> bool {
        matches!(self, Event::KeyDown { key, .. } if *key == code)
    }

    /// Position carried by pointer events
    #[inline]
    pub fn pointer_position(&self) -> Option<Vec2> {
        match self {
            Event::MouseMove { pos } | Event::MouseDown { pos, .. } | Event::MouseUp { pos, .. } => {
                Some(*pos)
            }
            _ => None,
        }
    }
}

/// Read only view of a frame shared by every widget.
/// Nothing consumes events, all the listeners see the same list.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub events: &'a [Event],
    /// Pointer position sampled once at the start of the frame
    pub pointer: Vec2,
}

impl<'a> FrameInput<'a> {
    pub fn new(events: &'a [Event], pointer: Vec2) -> Self {
        Self { events, pointer }
    }

    #[inline]
    pub fn mouse_downs(&self) -> impl Iterator<Item = MouseButton> + 'a {
        self.events.iter().filter_map(|evt| match evt {
            Event::MouseDown { button, .. } => Some(*button),
            _ => None,
        })
    }

    #[inline]
    pub fn key_downs(&self) -> impl Iterator<Item = (KeyCode, Option<char>)> + 'a {
        self.events.iter().filter_map(|evt| match evt {
            Event::KeyDown { key, text } => Some((*key, *text)),
            _ => None,
        })
    }
}
