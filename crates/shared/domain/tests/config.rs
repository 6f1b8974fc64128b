use bhub_domain::config::{ApiConfig, BundlesConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4720);
    assert!(server.ssl.is_none());

    let bundles = BundlesConfig::default();
    assert_eq!(bundles.mapping, std::path::PathBuf::from("bundles.toml"));
    assert_eq!(bundles.static_dir, std::path::PathBuf::from("public"));
    assert_eq!(bundles.default_key, "en");
    assert!(bundles.cache_capacity > 0);
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "bundles": {
            "mapping": "/etc/bundlehub/bundles.toml",
            "static_dir": "/srv/static",
            "default_key": "web",
            "cache_capacity": 16
        }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.bundles.default_key, "web");
    assert_eq!(cfg.bundles.static_dir, std::path::PathBuf::from("/srv/static"));
}

#[test]
fn partial_config_fills_defaults() {
    let raw = json!({ "server": { "port": 9000 } });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.bundles.default_key, "en");
}
