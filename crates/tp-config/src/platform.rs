//! Platform configuration: server origin, URL paths, messaging alias.

use serde::{Deserialize, Serialize};

fn default_server_origin() -> String {
    String::from("http://127.0.0.1:8080")
}

fn default_thingpedia_path() -> String {
    String::from("/thingpedia")
}

fn default_cdn_host() -> String {
    String::from("/download")
}

fn default_messaging_device() -> String {
    String::from("org.thingpedia.builtin.matrix")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Public origin of this server, scheme included.
    #[serde(default = "default_server_origin")]
    pub server_origin: String,

    /// Path of the Thingpedia API under the server origin.
    #[serde(default = "default_thingpedia_path")]
    pub thingpedia_path: String,

    /// Base URL (or origin-relative path) that packaged device modules are
    /// served from.
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,

    /// The device kind aliased under the literal `messaging` key during
    /// setup resolution.
    #[serde(default = "default_messaging_device")]
    pub messaging_device: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            server_origin: default_server_origin(),
            thingpedia_path: default_thingpedia_path(),
            cdn_host: default_cdn_host(),
            messaging_device: default_messaging_device(),
        }
    }
}

impl PlatformConfig {
    /// The absolute Thingpedia API URL handed to the external trainer.
    #[must_use]
    pub fn thingpedia_url(&self) -> String {
        format!(
            "{}{}",
            self.server_origin.trim_end_matches('/'),
            self.thingpedia_path
        )
    }
}
