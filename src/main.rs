use ballpit::{window, AppError, SimConfig};

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };

    window::run(config)
}
