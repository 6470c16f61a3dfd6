use std::path::PathBuf;

/// Initialize the process logger. Respects RUST_LOG if set, otherwise
/// defaults to info. If a log file was requested but cannot be opened, fall
/// back to stderr rather than failing startup.
pub fn init(log_file: Option<PathBuf>) {
    use env_logger::Target;

    let target = log_file
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        })
        .map(|file| Target::Pipe(Box::new(file)))
        .unwrap_or(Target::Stderr);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(target)
        .init();
}
