use crate::conf::ConfigError;

/// Expand a bare `:port` to all interfaces and check the port.
pub fn normalize_listen_addr(addr: &str) -> Result<String, ConfigError> {
    let addr = addr.trim();
    let Some((host, port)) = addr.rsplit_once(':') else {
        return Err(ConfigError::invalid_listen_address(
            addr,
            "expected host:port or :port",
        ));
    };

    port.parse::<u16>()
        .map_err(|e| ConfigError::invalid_listen_address(addr, format!("bad port: {e}")))?;

    if host.is_empty() {
        return Ok(format!("0.0.0.0:{port}"));
    }

    Ok(addr.to_string())
}

pub fn validate_metrics_path(path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') || path == "/" {
        return Err(ConfigError::InvalidMetricsPath {
            path: path.to_string(),
        });
    }
    Ok(())
}
