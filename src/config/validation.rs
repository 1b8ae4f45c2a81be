use super::Config;

/// Validate a loaded configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let windows = &config.seasons.windows;
    for (i, window) in windows.iter().enumerate() {
        if window.from > window.to {
            errors.push(format!(
                "seasons.windows[{}]: from ({}) is after to ({})",
                i, window.from, window.to
            ));
        }
        if window.season == config.seasons.fallback {
            errors.push(format!(
                "seasons.windows[{}]: season {} is also the fallback season",
                i, window.season
            ));
        }
        for (j, other) in windows.iter().enumerate().skip(i + 1) {
            if window.season == other.season {
                errors.push(format!(
                    "seasons.windows[{}]: season {} is reused by windows[{}]",
                    i, window.season, j
                ));
            }
            if window.from <= other.to && other.from <= window.to {
                errors.push(format!(
                    "seasons.windows[{}]: overlaps windows[{}]",
                    i, j
                ));
            }
        }
    }

    let formats = &config.match_formats;
    if formats.small_max < 1 {
        errors.push("match_formats.small_max: must be at least 1".to_string());
    }
    if formats.small_max >= formats.medium_max {
        errors.push(format!(
            "match_formats: small_max ({}) must be less than medium_max ({})",
            formats.small_max, formats.medium_max
        ));
    }

    let tiers = &config.tiers;
    if tiers.min_clusters < 1 {
        errors.push("tiers.min_clusters: must be at least 1".to_string());
    }
    if tiers.min_clusters > tiers.max_clusters {
        errors.push(format!(
            "tiers: min_clusters ({}) is greater than max_clusters ({})",
            tiers.min_clusters, tiers.max_clusters
        ));
    }
    if tiers.restarts < 1 {
        errors.push("tiers.restarts: must be at least 1".to_string());
    }
    if tiers.price_max < tiers.price_min {
        errors.push(format!(
            "tiers: price_max ({}) is below price_min ({})",
            tiers.price_max, tiers.price_min
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
