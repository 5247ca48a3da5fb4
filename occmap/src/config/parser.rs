//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.
//! Unknown sections and keys are ignored.

use ini::{Ini, Properties};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::capabilities::MAX_PROBE_ZOOM;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Reads `key` from `section` and parses it, if present.
fn parse_key<T: FromStr>(
    props: &Properties,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match props.get(key) {
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, v, reason)),
        None => Ok(None),
    }
}

/// Like [`parse_key`] but rejects zero.
fn parse_positive(
    props: &Properties,
    section: &str,
    key: &str,
) -> Result<Option<u32>, ConfigFileError> {
    let reason = "must be a positive integer";
    match parse_key::<u32>(props, section, key, reason)? {
        Some(0) => Err(invalid(section, key, "0", reason)),
        other => Ok(other),
    }
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("bind") {
            let v = v.trim();
            v.parse::<SocketAddr>().map_err(|_| {
                invalid("server", "bind", v, "expected an address like '0.0.0.0:8080'")
            })?;
            config.server.bind = v.to_string();
        }
    }

    // [storage] section
    if let Some(section) = ini.section(Some("storage")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            let parsed = url::Url::parse(v)
                .map_err(|e| invalid("storage", "url", v, &format!("not a valid URL: {}", e)))?;
            if parsed.cannot_be_a_base() {
                return Err(invalid("storage", "url", v, "must be an http(s) base URL"));
            }
            config.storage.url = v.to_string();
        }
        if let Some(v) = section.get("table") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("storage", "table", v, "must not be empty"));
            }
            config.storage.table = v.to_string();
        }
        if let Some(v) = parse_positive(section, "storage", "salt_modulus")? {
            config.storage.salt_modulus = v;
        }
        if let Some(v) = parse_key(
            section,
            "storage",
            "timeout",
            "must be a positive integer (seconds)",
        )? {
            config.storage.timeout = v;
        }
        if let Some(v) = parse_key(
            section,
            "storage",
            "max_retries",
            "must be a non-negative integer",
        )? {
            config.storage.max_retries = v;
        }
        if let Some(v) = parse_key(
            section,
            "storage",
            "retry_backoff_ms",
            "must be a non-negative integer (milliseconds)",
        )? {
            config.storage.retry_backoff_ms = v;
        }
    }

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = parse_positive(section, "tiles", "tile_size")? {
            config.tiles.tile_size = v;
        }
        if let Some(v) = parse_key(
            section,
            "tiles",
            "buffer_size",
            "must be a non-negative integer",
        )? {
            config.tiles.buffer_size = v;
        }
    }

    // [hex] section
    if let Some(section) = ini.section(Some("hex")) {
        if let Some(v) = parse_positive(section, "hex", "default_hex_per_tile")? {
            config.hex.default_hex_per_tile = v;
        }
    }

    // [capabilities] section
    if let Some(section) = ini.section(Some("capabilities")) {
        let reason = format!("must be a zoom level between 0 and {}", MAX_PROBE_ZOOM);
        if let Some(v) = parse_key::<u8>(section, "capabilities", "root_zoom", &reason)? {
            if v > MAX_PROBE_ZOOM {
                return Err(invalid("capabilities", "root_zoom", &v.to_string(), &reason));
            }
            config.capabilities.root_zoom = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_overlays_values() {
        let config = parse(
            "[storage]\nurl = http://store:8070/\ntable = density\nsalt_modulus = 100\n\
             [tiles]\ntile_size = 256\nbuffer_size = 0\n[hex]\ndefault_hex_per_tile = 20\n",
        )
        .unwrap();

        assert_eq!(config.storage.url, "http://store:8070/");
        assert_eq!(config.storage.table, "density");
        assert_eq!(config.storage.salt_modulus, 100);
        assert_eq!(config.tiles.tile_size, 256);
        assert_eq!(config.tiles.buffer_size, 0);
        assert_eq!(config.hex.default_hex_per_tile, 20);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse("[server]\nworkers = 9\n[mystery]\nkey = value\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_zero_salt_modulus_rejected() {
        let err = parse("[storage]\nsalt_modulus = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref section, ref key, .. }
                if section == "storage" && key == "salt_modulus"
        ));
    }

    #[test]
    fn test_bad_bind_rejected() {
        assert!(parse("[server]\nbind = localhost\n").is_err());
        assert!(parse("[server]\nbind = 127.0.0.1:3000\n").is_ok());
    }

    #[test]
    fn test_bad_url_rejected() {
        assert!(parse("[storage]\nurl = not a url\n").is_err());
        assert!(parse("[storage]\nurl = mailto:someone@example.org\n").is_err());
    }

    #[test]
    fn test_root_zoom_bounded() {
        assert_eq!(
            parse("[capabilities]\nroot_zoom = 2\n")
                .unwrap()
                .capabilities
                .root_zoom,
            2
        );
        assert!(parse("[capabilities]\nroot_zoom = 3\n").is_err());
        assert!(matches!(
            parse("[capabilities]\nroot_zoom = 22\n"),
            Err(ConfigFileError::InvalidValue { ref key, .. }) if key == "root_zoom"
        ));
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        assert_eq!(expand_tilde("/var/log/occmap"), PathBuf::from("/var/log/occmap"));
        assert_eq!(expand_tilde("logs"), PathBuf::from("logs"));
    }
}
