use fieldkit::prelude::*;

const SCRIPT: &str = "demos/scripts/text_fields.json";
const SCREENSHOT: &str = "text_fields.png";

fn main() -> Result<(), String> {
    #[cfg(feature = "logs")]
    init_logs(LogConfig::debug());

    let config = AppConfig::default()
        .title("Text fields")
        .size(800, 600)
        .persist(true);

    // replay the given script, or the bundled one
    let script_path = std::env::args().nth(1).unwrap_or_else(|| SCRIPT.to_string());
    let script = InputScript::load(&script_path)?;
    let backend = HeadlessBackend::new(config.size.x, config.size.y).with_script(script);

    let underlined = TextField::load_font(
        TextFieldConfig::new("test")
            .bounds(100.0, 100.0, 100.0, 30.0)
            .colors(Color::WHITE, Color::GREEN, Color::RED)
            .draw_type(DrawType::Line),
    )?;

    let centered = TextField::load_font(
        TextFieldConfig::new("another")
            .bounds(100.0, 300.0, 250.0, 18.0)
            .colors(Color::WHITE, Color::GREEN, Color::RED)
            .alignment(Alignment::Centered),
    )?;

    // fields don't create the save directory
    let save_dir = &underlined.config().path_prefix;
    std::fs::create_dir_all(save_dir)
        .map_err(|e| format!("Cannot create save directory '{save_dir}': {e}"))?;

    let mut app = App::with_config(backend, config)
        .add_widget(underlined)
        .add_widget(centered);

    app.run()?;
    app.backend().save_screenshot(SCREENSHOT)?;

    log::info!("Last frame saved to '{SCREENSHOT}'");
    Ok(())
}
