use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("mediasync: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; every setting also has a flag or a default.
            eprintln!("mediasync: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
