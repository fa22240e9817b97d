use web_sys::Window;

/// Base URL of the analysis API, baked in at build time.
///
/// Debug builds read `SMARTNOTE_API_URL_DEV`, release builds
/// `SMARTNOTE_API_URL_PROD`.
pub fn analysis_endpoint() -> Option<&'static str> {
    if cfg!(debug_assertions) {
        option_env!("SMARTNOTE_API_URL_DEV")
    } else {
        option_env!("SMARTNOTE_API_URL_PROD")
    }
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search_has_debug_flag(&search)
}

fn search_has_debug_flag(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .any(|pair| matches!(pair, "debug=1" | "debug=true" | "log=1" | "log=true"))
}

pub fn log_level(window: &Window) -> log::Level {
    if debug_enabled(window) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_is_read_from_query() {
        assert!(search_has_debug_flag("?debug=1"));
        assert!(search_has_debug_flag("?tab=2&log=true"));
        assert!(!search_has_debug_flag("?debug=0"));
        assert!(!search_has_debug_flag(""));
    }
}
