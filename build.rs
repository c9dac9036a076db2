use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment-derived configuration defaults.
///
/// Each variable is forwarded to the crate via `cargo:rustc-env`; when it
/// is absent the fallback is used. These become the compiled-in defaults
/// seeded into the configuration store on first boot.
const DEFAULTS: &[(&str, &str)] = &[
    ("WIFI_SSID", ""),
    ("WIFI_PASSWORD", ""),
    ("OTA_SERVER_IP", "192.168.1.1"),
    ("OTA_SERVER_HOSTNAME", "update.local"),
    ("OTA_SERVER_PORT", "8080"),
    ("OTA_VERSION_FILENAME", "version"),
    ("OTA_FILENAME", "firmware.bin"),
    ("BROKER_URL", "mqtt://broker.local:1883"),
];

fn main() {
    for (name, fallback) in DEFAULTS {
        match env::var(name) {
            Ok(value) => {
                println!("cargo:rustc-env={}={}", name, value);
                if *name == "WIFI_PASSWORD" {
                    println!("cargo:warning=Using {} from environment (hidden)", name);
                } else {
                    println!("cargo:warning=Using {} from environment: {}", name, value);
                }
            }
            Err(_) => println!("cargo:rustc-env={}={}", name, fallback),
        }
        println!("cargo:rerun-if-env-changed={}", name);
    }

    // Build timestamp, seeded as the OTA_TIMESTAMP default. Overridable for
    // reproducible builds.
    let timestamp = env::var("BUILD_TIMESTAMP").unwrap_or_else(|_| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs().to_string())
            .unwrap_or_else(|_| "0".to_string())
    });
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rerun-if-env-changed=BUILD_TIMESTAMP");
}
