use std::collections::HashMap;
use std::sync::OnceLock;

pub const BASE_URL: &str = "https://www.startpage.com";
pub const SEARCH_PATH: &str = "/sp/search";
pub const SUGGESTIONS_PATH: &str = "/suggestions";

pub const SEARCH_COMMAND: &str = "process_search";
pub const SUGGESTIONS_SEGMENT: &str = "startpage.ucp";
pub const SUGGESTIONS_FORMAT: &str = "opensearch";

pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("DNT", "1"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Cache-Control", "max-age=0"),
];

static LANGUAGE_CODES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static REGION_CODES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static SAFE_SEARCH_LEVELS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static TIME_FILTERS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static IMAGE_SIZES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static VIDEO_DURATIONS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static ADVANCED_SEARCH_PARAMS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn get_language_codes() -> &'static HashMap<&'static str, &'static str> {
    LANGUAGE_CODES.get_or_init(|| {
        HashMap::from([
            ("english", "en"),
            ("german", "de"),
            ("french", "fr"),
            ("spanish", "es"),
            ("italian", "it"),
            ("dutch", "nl"),
            ("portuguese", "pt"),
            ("russian", "ru"),
            ("chinese", "zh"),
            ("japanese", "ja"),
        ])
    })
}

fn get_region_codes() -> &'static HashMap<&'static str, &'static str> {
    REGION_CODES.get_or_init(|| {
        HashMap::from([
            ("all", "all"),
            ("us", "us"),
            ("uk", "uk"),
            ("ca", "ca"),
            ("au", "au"),
            ("de", "de"),
            ("fr", "fr"),
            ("es", "es"),
            ("it", "it"),
            ("nl", "nl"),
        ])
    })
}

fn get_safe_search_levels() -> &'static HashMap<&'static str, &'static str> {
    SAFE_SEARCH_LEVELS
        .get_or_init(|| HashMap::from([("strict", "1"), ("moderate", "0"), ("off", "2")]))
}

fn get_time_filters() -> &'static HashMap<&'static str, &'static str> {
    TIME_FILTERS.get_or_init(|| {
        HashMap::from([
            ("any", ""),
            ("day", "d"),
            ("week", "w"),
            ("month", "m"),
            ("year", "y"),
        ])
    })
}

fn get_image_sizes() -> &'static HashMap<&'static str, &'static str> {
    IMAGE_SIZES.get_or_init(|| {
        HashMap::from([
            ("any", ""),
            ("small", "s"),
            ("medium", "m"),
            ("large", "l"),
            ("wallpaper", "w"),
        ])
    })
}

fn get_video_durations() -> &'static HashMap<&'static str, &'static str> {
    VIDEO_DURATIONS.get_or_init(|| {
        HashMap::from([("any", ""), ("short", "s"), ("medium", "m"), ("long", "l")])
    })
}

fn get_advanced_search_params() -> &'static HashMap<&'static str, &'static str> {
    ADVANCED_SEARCH_PARAMS.get_or_init(|| {
        HashMap::from([
            ("search_source", "sc"),
            ("search_results", "sr"),
            ("search_expander_api_path", "sxap"),
            ("query_instant_mode_search_number", "qimsn"),
            ("time_filter", "with_date"),
            ("ad_block_plus", "abp"),
            ("search_type_modifier", "t"),
        ])
    })
}

// Every lookup falls back to the key itself, so values the tables don't know
// about yet still reach the upstream unchanged.
fn lookup<'a>(table: &HashMap<&'static str, &'static str>, key: &'a str) -> &'a str {
    table.get(key).copied().unwrap_or(key)
}

pub fn language_code(language: &str) -> &str {
    lookup(get_language_codes(), language)
}

pub fn region_code(region: &str) -> &str {
    lookup(get_region_codes(), region)
}

pub fn safe_search_level(level: &str) -> &str {
    lookup(get_safe_search_levels(), level)
}

pub fn time_filter(filter: &str) -> &str {
    lookup(get_time_filters(), filter)
}

pub fn image_size(size: &str) -> &str {
    lookup(get_image_sizes(), size)
}

pub fn video_duration(duration: &str) -> &str {
    lookup(get_video_durations(), duration)
}

pub fn advanced_param(key: &str) -> &str {
    lookup(get_advanced_search_params(), key)
}

pub fn search_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), SEARCH_PATH)
}

pub fn suggestions_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), SUGGESTIONS_PATH)
}
