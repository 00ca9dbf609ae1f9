use crate::widgets::Widget;
use corelib::app::AppConfig;
use corelib::backend::{Backend, FpsLimiter, LimitMode};
use corelib::events::{Event, FrameInput};
use draw::{Canvas, Surface};

/// Application loop: every frame polls the input, draws the widgets,
/// updates them and presents the result
pub struct App<B: Backend> {
    config: AppConfig,
    backend: B,
    canvas: Canvas,
    widgets: Vec<Box<dyn Widget>>,
    events: Vec<Event>,
    limiter: FpsLimiter,
    running: bool,
    frame_count: u64,
}

impl<B: Backend> App<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, AppConfig::default())
    }

    pub fn with_config(backend: B, config: AppConfig) -> Self {
        let size = backend.size();
        if size != config.size {
            log::debug!(
                "Backend size {size:?} differs from the configured {:?}, using the backend size",
                config.size
            );
        }

        let limiter = FpsLimiter::new(LimitMode::from(config.max_fps));
        Self {
            config,
            backend,
            canvas: Canvas::new(size.x, size.y),
            widgets: vec![],
            events: vec![],
            limiter,
            running: true,
            frame_count: 0,
        }
    }

    /// Registers a widget, widgets are drawn and updated in registration order
    pub fn add_widget<W: Widget + 'static>(mut self, widget: W) -> Self {
        self.push_widget(widget);
        self
    }

    pub fn push_widget<W: Widget + 'static>(&mut self, widget: W) {
        self.widgets.push(Box::new(widget));
    }

    #[inline]
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Frame drawn during the last tick
    #[inline]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Events polled during the last tick
    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The loop ends before starting the next frame
    pub fn stop(&mut self) {
        self.running = false;
    }

    fn is_exit_event(&self, evt: &Event) -> bool {
        evt.is_quit() || self.config.exit_key.is_some_and(|key| evt.is_key_down(key))
    }

    /// Runs a single frame
    pub fn tick(&mut self) -> Result<(), String> {
        self.backend.poll_events(&mut self.events);
        let pointer = self.backend.mouse_position();

        // the current frame is completed even if an exit is requested
        if self.events.iter().any(|evt| self.is_exit_event(evt)) {
            log::debug!("Exit requested at frame {}", self.frame_count);
            self.running = false;
        }

        self.canvas.clear(self.config.clear_color);
        self.widgets
            .iter()
            .for_each(|widget| widget.draw(&mut self.canvas));

        let input = FrameInput::new(&self.events, pointer);
        self.widgets
            .iter_mut()
            .for_each(|widget| widget.update(&input));

        self.backend
            .present(self.canvas.bitmap())
            .map_err(|e| format!("Cannot present frame {}: {e}", self.frame_count))?;
        self.frame_count += 1;

        self.limiter.tick();

        Ok(())
    }

    /// Reloads the persisted state of every widget
    pub fn restore_widgets(&mut self) {
        self.widgets.iter_mut().for_each(|widget| widget.restore());
    }

    /// Persists every widget, returning the first error after trying all of them
    pub fn persist_widgets(&self) -> Result<(), String> {
        let mut result = Ok(());
        for widget in &self.widgets {
            if let Err(e) = widget.persist() {
                log::error!("{e}");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        result
    }

    /// Loops until the user asks to exit
    pub fn run(&mut self) -> Result<(), String> {
        log::info!(
            "Running '{}' with {} widgets",
            self.config.title,
            self.widgets.len()
        );

        if self.config.persist {
            self.restore_widgets();
        }

        let mut result = Ok(());
        while self.running {
            if let Err(e) = self.tick() {
                result = Err(e);
                break;
            }
        }

        if self.config.persist {
            let persisted = self.persist_widgets();
            result = result.and(persisted);
        }

        log::info!("Closing after {} frames", self.frame_count);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save;
    use crate::widgets::test_utils::BlockRenderer;
    use crate::widgets::{DrawType, TextField, TextFieldConfig};
    use corelib::backend::{HeadlessBackend, InputScript};
    use corelib::gfx::{Bitmap, Color};
    use corelib::input::KeyCode;
    use corelib::math::{UVec2, Vec2, uvec2, vec2};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        id: &'static str,
        log: Log,
    }

    impl Widget for Recorder {
        fn draw(&self, _surface: &mut dyn Surface) {
            self.log.borrow_mut().push(format!("draw {}", self.id));
        }

        fn update(&mut self, input: &FrameInput) {
            self.log
                .borrow_mut()
                .push(format!("update {} {}", self.id, input.events.len()));
        }

        fn restore(&mut self) {
            self.log.borrow_mut().push(format!("restore {}", self.id));
        }

        fn persist(&self) -> Result<(), String> {
            self.log.borrow_mut().push(format!("persist {}", self.id));
            Ok(())
        }
    }

    /// Backend that fails to present
    struct Broken;

    impl Backend for Broken {
        fn size(&self) -> UVec2 {
            uvec2(4, 4)
        }

        fn poll_events(&mut self, out: &mut Vec<Event>) {
            out.clear();
        }

        fn mouse_position(&self) -> Vec2 {
            Vec2::ZERO
        }

        fn present(&mut self, _frame: &Bitmap) -> Result<(), String> {
            Err("device lost".to_string())
        }
    }

    fn config() -> AppConfig {
        AppConfig::default().size(400, 400).unlimited_fps()
    }

    fn recorders(app: &mut App<HeadlessBackend>, log: &Log) {
        for id in ["a", "b"] {
            app.push_widget(Recorder {
                id,
                log: log.clone(),
            });
        }
    }

    #[test]
    fn test_draws_all_then_updates_all_in_order() {
        let log = Log::default();
        let backend = HeadlessBackend::new(400, 400).quit_when_done(false);
        let mut app = App::with_config(backend, config());
        recorders(&mut app, &log);
        assert_eq!(app.widget_count(), 2);

        app.backend_mut()
            .push_frame([Event::key_down(KeyCode::KeyX), Event::key_down(KeyCode::KeyY)]);
        app.tick().unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["draw a", "draw b", "update a 2", "update b 2"]
        );
        assert_eq!(app.events().len(), 2);
        assert_eq!(app.frame_count(), 1);
        assert!(app.is_running());
        assert_eq!(app.backend().frames_presented(), 1);
    }

    #[test]
    fn test_events_are_replaced_each_frame() {
        let backend = HeadlessBackend::new(400, 400)
            .quit_when_done(false)
            .with_script(InputScript::new().frame([Event::key_down(KeyCode::KeyA)]).idle(1));
        let mut app = App::with_config(backend, config());

        app.tick().unwrap();
        assert_eq!(app.events().len(), 1);
        app.tick().unwrap();
        assert!(app.events().is_empty());
    }

    #[test]
    fn test_quit_completes_the_frame() {
        let log = Log::default();
        let script = InputScript::new()
            .idle(2)
            .frame([Event::Quit, Event::key_down(KeyCode::KeyA)])
            .idle(5);
        let backend = HeadlessBackend::new(400, 400).with_script(script);
        let mut app = App::with_config(backend, config());
        recorders(&mut app, &log);

        app.run().unwrap();

        assert!(!app.is_running());
        assert_eq!(app.frame_count(), 3);
        assert_eq!(app.backend().frames_presented(), 3);
        assert_eq!(log.borrow().last().map(String::as_str), Some("update b 2"));
        assert_eq!(app.backend().pending_frames(), 5);
    }

    #[test]
    fn test_exit_key() {
        let script = InputScript::new()
            .frame([Event::typed(KeyCode::KeyQ, 'q')])
            .idle(3);

        let backend = HeadlessBackend::new(400, 400).with_script(script.clone());
        let mut app = App::with_config(backend, config());
        app.run().unwrap();
        assert_eq!(app.frame_count(), 1);

        // without exit key the loop ends when the script emits Quit
        let backend = HeadlessBackend::new(400, 400).with_script(script);
        let mut app = App::with_config(backend, config().exit_key(None));
        app.run().unwrap();
        assert_eq!(app.frame_count(), 5);
    }

    #[test]
    fn test_stop_before_run() {
        let mut app = App::with_config(HeadlessBackend::new(10, 10), config());
        app.stop();
        app.run().unwrap();
        assert_eq!(app.frame_count(), 0);
    }

    #[test]
    fn test_present_error_is_returned() {
        let log = Log::default();
        let mut app = App::with_config(Broken, config().persist(true)).add_widget(Recorder {
            id: "a",
            log: log.clone(),
        });

        let err = app.run().unwrap_err();
        assert!(err.contains("device lost"), "got '{err}'");
        assert_eq!(app.frame_count(), 0);

        // widgets are persisted even when the loop fails
        assert_eq!(
            *log.borrow(),
            vec!["restore a", "draw a", "update a 0", "persist a"]
        );
    }

    #[test]
    fn test_persist_hooks_only_when_enabled() {
        let log = Log::default();
        let mut app = App::with_config(HeadlessBackend::new(400, 400), config());
        recorders(&mut app, &log);
        app.run().unwrap();
        assert!(!log.borrow().iter().any(|l| l.starts_with("restore")));
        assert!(!log.borrow().iter().any(|l| l.starts_with("persist")));

        let log = Log::default();
        let mut app = App::with_config(HeadlessBackend::new(400, 400), config().persist(true));
        recorders(&mut app, &log);
        app.run().unwrap();

        let log = log.borrow();
        assert_eq!(&log[..2], &["restore a", "restore b"]);
        assert_eq!(&log[log.len() - 2..], &["persist a", "persist b"]);
    }

    fn text_field(prefix: &str) -> TextField {
        TextField::new(
            TextFieldConfig::new("test")
                .bounds(100.0, 100.0, 100.0, 30.0)
                .colors(Color::WHITE, Color::GREEN, Color::RED)
                .path_prefix(prefix),
            BlockRenderer::default(),
        )
    }

    #[test]
    fn test_type_into_field_and_persist() {
        let tmp = TempDir::new().unwrap();
        let prefix = format!("{}/", tmp.path().display());

        let script = InputScript::new()
            .frame([Event::click(vec2(150.0, 110.0))])
            .frame([
                Event::key_down(KeyCode::KeyH),
                Event::key_down(KeyCode::KeyI),
            ])
            .frame([Event::click(vec2(0.0, 0.0))])
            .frame([Event::key_down(KeyCode::KeyZ)]);
        let backend = HeadlessBackend::new(400, 400).with_script(script);
        let mut app = App::with_config(backend, config().persist(true)).add_widget(text_field(&prefix));
        app.run().unwrap();

        assert_eq!(
            save::load_text(&tmp.path().join("test_text.p")),
            Ok("hi".to_string())
        );

        // a new app restores the text before the first frame
        let backend = HeadlessBackend::new(400, 400).with_script(
            InputScript::new()
                .frame([Event::click(vec2(150.0, 110.0))])
                .frame([Event::key_down(KeyCode::Digit2)]),
        );
        let mut app = App::with_config(backend, config().persist(true)).add_widget(text_field(&prefix));
        app.run().unwrap();

        assert_eq!(
            save::load_text(&tmp.path().join("test_text.p")),
            Ok("hi2".to_string())
        );
    }

    #[test]
    fn test_presented_frame_shows_focus_color() {
        let backend = HeadlessBackend::new(400, 400)
            .quit_when_done(false)
            .with_script(InputScript::new().frame([Event::click(vec2(150.0, 110.0))]).idle(1));
        let mut app = App::with_config(backend, config()).add_widget(text_field("unused/"));

        let green = Color::GREEN.to_rgba_u8();
        let red = Color::RED.to_rgba_u8();
        let black = Color::BLACK.to_rgba_u8();

        // drawn before the click is processed
        app.tick().unwrap();
        let frame = app.backend().last_frame().unwrap();
        assert_eq!(frame.pixel(100, 100), Some(green));
        assert_eq!(frame.pixel(199, 129), Some(green));
        assert_eq!(frame.pixel(150, 115), Some(black));

        app.tick().unwrap();
        let frame = app.backend().last_frame().unwrap();
        assert_eq!(frame.pixel(100, 100), Some(red));
        assert_eq!(frame.pixel(200, 100), Some(black));
    }

    /// Keeps a handle to a field owned by the app
    struct Shared(Rc<RefCell<TextField>>);

    impl Widget for Shared {
        fn draw(&self, surface: &mut dyn Surface) {
            self.0.borrow().draw(surface);
        }

        fn update(&mut self, input: &FrameInput) {
            self.0.borrow_mut().update(input);
        }
    }

    fn shared_field(name: &str, x: f32, y: f32) -> Rc<RefCell<TextField>> {
        Rc::new(RefCell::new(TextField::new(
            TextFieldConfig::new(name)
                .bounds(x, y, 100.0, 30.0)
                .colors(Color::WHITE, Color::GREEN, Color::RED),
            BlockRenderer::default(),
        )))
    }

    #[test]
    fn test_focus_moves_between_fields() {
        let first = shared_field("first", 100.0, 100.0);
        let second = shared_field("second", 100.0, 200.0);

        let script = InputScript::new()
            .frame([Event::click(vec2(150.0, 110.0)), Event::key_down(KeyCode::KeyA)])
            .frame([Event::click(vec2(150.0, 210.0)), Event::key_down(KeyCode::KeyB)])
            .frame([Event::key_down(KeyCode::KeyC)]);
        let backend = HeadlessBackend::new(400, 400)
            .quit_when_done(false)
            .with_script(script);
        let mut app = App::with_config(backend, config())
            .add_widget(Shared(first.clone()))
            .add_widget(Shared(second.clone()));

        app.tick().unwrap();
        assert!(first.borrow().is_focused());
        assert!(!second.borrow().is_focused());

        app.tick().unwrap();
        assert!(!first.borrow().is_focused());
        assert!(second.borrow().is_focused());

        app.tick().unwrap();
        assert_eq!(first.borrow().text(), "a");
        assert_eq!(second.borrow().text(), "bc");

        // the third frame is drawn with the focus set by the second one
        let frame = app.backend().last_frame().unwrap();
        assert_eq!(frame.pixel(100, 100), Some(Color::GREEN.to_rgba_u8()));
        assert_eq!(frame.pixel(100, 200), Some(Color::RED.to_rgba_u8()));
    }

    #[test]
    fn test_overlapping_fields_share_the_click() {
        let below = shared_field("below", 100.0, 100.0);
        let above = shared_field("above", 150.0, 110.0);

        let script = InputScript::new()
            .frame([Event::click(vec2(160.0, 115.0)), Event::key_down(KeyCode::KeyX)])
            .frame([Event::click(vec2(120.0, 105.0)), Event::key_down(KeyCode::KeyY)]);
        let backend = HeadlessBackend::new(400, 400)
            .quit_when_done(false)
            .with_script(script);
        let mut app = App::with_config(backend, config())
            .add_widget(Shared(below.clone()))
            .add_widget(Shared(above.clone()));

        app.tick().unwrap();
        assert!(below.borrow().is_focused());
        assert!(above.borrow().is_focused());
        assert_eq!(below.borrow().text(), "x");
        assert_eq!(above.borrow().text(), "x");

        // only the first field contains the second click
        app.tick().unwrap();
        assert!(below.borrow().is_focused());
        assert!(!above.borrow().is_focused());
        assert_eq!(below.borrow().text(), "xy");
        assert_eq!(above.borrow().text(), "x");
    }

    #[test]
    fn test_line_field_frame() {
        let field = TextField::new(
            TextFieldConfig::new("line")
                .bounds(10.0, 10.0, 20.0, 5.0)
                .colors(Color::WHITE, Color::GREEN, Color::RED)
                .draw_type(DrawType::Line),
            BlockRenderer::default(),
        );
        let mut app = App::with_config(HeadlessBackend::new(40, 40), config()).add_widget(field);
        app.tick().unwrap();

        let frame = app.canvas().bitmap();
        let green = Color::GREEN.to_rgba_u8();
        assert_eq!(frame.pixel(10, 15), Some(green));
        assert_eq!(frame.pixel(30, 15), Some(green));
        assert_eq!(frame.pixel(10, 10), Some(Color::BLACK.to_rgba_u8()));
    }
}
