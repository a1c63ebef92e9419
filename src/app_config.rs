use config::Config;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    cache: Cache,
    monitor: Monitor,
    kartaview: KartaView,
    position: Position,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .set_default("core.notifier_buffer_size", 16)
            .unwrap()
            .set_default("cache.directory", default_cache_directory())
            .unwrap()
            .set_default("monitor.min_distance_m", 100.0)
            .unwrap()
            .set_default("monitor.update_interval", "5s")
            .unwrap()
            .set_default("kartaview.url", "https://api.openstreetcam.org")
            .unwrap()
            .set_default("kartaview.zoom_level", 15)
            .unwrap()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn kartaview(&self) -> &KartaView {
        &self.kartaview
    }

    pub fn position(&self) -> &Position {
        &self.position
    }
}

fn default_cache_directory() -> String {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{home}/.streetscape_cache")
}

#[derive(Debug, Deserialize)]
pub struct Core {
    notifier_buffer_size: usize,
}

impl Core {
    pub fn notifier_buffer_size(&self) -> usize {
        self.notifier_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    directory: String,
}

impl Cache {
    pub fn directory(&self) -> &str {
        &self.directory
    }
}

#[derive(Debug, Deserialize)]
pub struct Monitor {
    min_distance_m: f64,
    #[serde(with = "humantime_serde")]
    update_interval: Duration,
}

impl Monitor {
    pub fn min_distance_m(&self) -> f64 {
        self.min_distance_m
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }
}

#[derive(Debug, Deserialize)]
pub struct KartaView {
    url: String,
    zoom_level: u8,
}

impl KartaView {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level
    }
}

#[derive(Debug, Deserialize)]
pub struct Position {
    replay_file: String,
}

impl Position {
    pub fn replay_file(&self) -> &str {
        &self.replay_file
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core { notifier_buffer_size: 1 },
                cache: Cache {
                    directory: ".streetscape_cache".to_string(),
                },
                monitor: Monitor {
                    min_distance_m: 100.0,
                    update_interval: Duration::from_secs(5),
                },
                kartaview: KartaView {
                    url: "https://api.openstreetcam.org".to_string(),
                    zoom_level: 15,
                },
                position: Position {
                    replay_file: "positions.json".to_string(),
                },
            },
        }
    }

    pub fn kartaview_url(mut self, url: String) -> Self {
        self.config.kartaview.url = url;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
