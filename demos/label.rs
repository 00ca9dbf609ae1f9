use fieldkit::prelude::*;

fn main() -> Result<(), String> {
    #[cfg(feature = "logs")]
    init_logs(LogConfig::info());

    let title = Label::load(LabelConfig::new(20.0, 20.0, "Name", Color::WHITE).font_size(24.0))?;
    let hint = Label::load(LabelConfig::new(20.0, 100.0, "Click the box and type", Color::GRAY))?;
    let name = TextField::load_font(
        TextFieldConfig::new("name")
            .bounds(20.0, 60.0, 200.0, 24.0)
            .colors(Color::WHITE, Color::GRAY, Color::YELLOW)
            .value("guest"),
    )?;

    let script = InputScript::new()
        .frame([Event::click(vec2(100.0, 70.0))])
        .frame([
            Event::key_down(KeyCode::Backspace),
            Event::key_down(KeyCode::Backspace),
        ])
        .frame([Event::key_down(KeyCode::KeyO), Event::key_down(KeyCode::KeyK)])
        .idle(2);

    let config = AppConfig::default().size(320, 140).unlimited_fps();
    let backend = HeadlessBackend::new(config.size.x, config.size.y).with_script(script);
    let mut app = App::with_config(backend, config)
        .add_widget(title)
        .add_widget(hint)
        .add_widget(name);

    app.run()?;
    app.backend().save_screenshot("label.png")
}
