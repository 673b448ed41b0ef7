//! Host identity lookup

/// Hostname of this machine, `"unknown"` when it cannot be determined
pub fn hostname() -> String {
    sysinfo::System::host_name().unwrap_or_else(|| "unknown".to_string())
}

/// Friendly OS name for tags and records
pub fn os_name() -> String {
    match std::env::consts::OS {
        "macos" => "MacOS".to_string(),
        "windows" => "Windows".to_string(),
        "linux" => "Linux".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_is_nonempty() {
        assert!(!hostname().is_empty());
    }

    #[test]
    fn test_os_name_is_friendly() {
        let os = os_name();
        assert!(!os.is_empty());
        // never the raw lowercase identifiers we map from
        assert_ne!(os, "macos");
        assert_ne!(os, "linux");
    }
}
