use rustc_hash::FxHashMap;

/// Configure the logs output
/// Logs will show a timestamp using the local time (UTC if the offset is unknown)
/// with format `[year]-[month]-[day] [hour]:[minutes]:[seconds]`
#[derive(Clone, Debug)]
pub struct LogConfig {
    level: log::LevelFilter,
    levels_for: FxHashMap<String, log::LevelFilter>,
    colored: bool,
    verbose: bool,
    file_path: Option<std::path::PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        let level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        };

        Self {
            level,
            levels_for: Default::default(),
            colored: cfg!(debug_assertions),
            verbose: false,
            file_path: None,
        }
    }
}

impl LogConfig {
    /// Creates a new configuration using the given level filter
    pub fn new(level: log::LevelFilter) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Configure logs to use trace level filter
    pub fn trace() -> Self {
        Self::new(log::LevelFilter::Trace)
    }

    /// Configure logs to use debug level filter
    pub fn debug() -> Self {
        Self::new(log::LevelFilter::Debug)
    }

    /// Configure logs to use info level filter
    pub fn info() -> Self {
        Self::new(log::LevelFilter::Info)
    }

    /// Configure logs to use warn level filter
    pub fn warn() -> Self {
        Self::new(log::LevelFilter::Warn)
    }

    /// Configure logs to use error level filter
    pub fn error() -> Self {
        Self::new(log::LevelFilter::Error)
    }

    /// Changes the level filter
    pub fn level(mut self, level: log::LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Change the filter level for dependencies
    pub fn level_for(mut self, id: &str, level: log::LevelFilter) -> Self {
        self.levels_for.insert(id.to_string(), level);
        self
    }

    /// Enable colored text (Defaults to true on debug mode)
    pub fn use_colors(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// Log everything including dependencies
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Save logs to a file
    pub fn to_file<P>(mut self, path: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        self.file_path = Some(path.into());
        self
    }
}

fn get_time() -> String {
    let Ok(format) = time::format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
    else {
        return String::new();
    };

    time::OffsetDateTime::now_local()
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
        .format(&format)
        .unwrap_or_default()
}

fn set_panic_hook() {
    use std::panic::{self, PanicHookInfo};

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        panic_to_log_error_hook(info);
        default_hook(info);
    }));
}

fn panic_to_log_error_hook(info: &std::panic::PanicHookInfo) {
    let payload = if let Some(payload) = info.payload().downcast_ref::<&str>() {
        payload
    } else if let Some(payload) = info.payload().downcast_ref::<String>() {
        payload.as_str()
    } else {
        "Unknown"
    };

    match info.location() {
        Some(location) => log::error!(
            "Panic at '{}:{}': {payload}",
            location.file(),
            location.line()
        ),
        None => log::error!("Panic: {payload}"),
    }
}

fn chain_save_to_file(dispatch: fern::Dispatch, config: &LogConfig) -> fern::Dispatch {
    let Some(path) = &config.file_path else {
        return dispatch;
    };

    match fern::log_file(path) {
        Ok(file) => dispatch.chain(file),
        Err(e) => {
            eprintln!("Error opening log file '{}': {e}", path.display());
            dispatch
        }
    }
}

/// Crates that flood the output at debug level
const NOISY_TARGETS: [&str; 3] = ["cosmic_text", "fontdb", "swash"];

/// Sets the global logger, only the first call takes effect
pub fn init_logs(mut config: LogConfig) {
    if !config.verbose {
        NOISY_TARGETS.iter().for_each(|id| {
            config
                .levels_for
                .entry(id.to_string())
                .or_insert(log::LevelFilter::Warn);
        });
    }

    let mut dispatch = fern::Dispatch::new().level(config.level);

    for (id, lvl) in config.levels_for.iter() {
        dispatch = dispatch.level_for(id.clone(), *lvl);
    }

    let use_colors = config.file_path.is_none() && config.colored;
    if use_colors {
        use fern::colors::{Color, ColoredLevelConfig};

        let color_level = ColoredLevelConfig::new()
            .error(Color::BrightRed)
            .warn(Color::BrightYellow)
            .info(Color::BrightGreen)
            .debug(Color::BrightCyan)
            .trace(Color::BrightBlack);

        dispatch = dispatch.format(move |out, message, record| {
            out.finish(format_args!(
                "\x1b[0m{date} [{target}] {level}: {message}",
                date = get_time(),
                target = record.target(),
                level = format_args!(
                    "{}\x1b[{}m",
                    color_level.color(record.level()),
                    Color::White.to_fg_str()
                ),
                message = message,
            ))
        });
    } else {
        dispatch = dispatch.format(move |out, message, record| {
            out.finish(format_args!(
                "{date} [{target}] {level}: {message}",
                date = get_time(),
                target = record.target(),
                level = record.level(),
                message = message,
            ))
        });
    }

    dispatch = match config.file_path {
        Some(_) => chain_save_to_file(dispatch, &config),
        None => dispatch.chain(std::io::stdout()),
    };

    match dispatch.apply() {
        Ok(_) => set_panic_hook(),
        Err(e) => eprintln!("Error initializing logs: {e}"),
    }
}
