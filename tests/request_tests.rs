use startpage::endpoints;
use startpage::request::{ParameterSet, SearchRequest};
use startpage::{Category, SearchOptions, StartpageError};

fn build(query: &str, category: Category, options: SearchOptions) -> ParameterSet {
    SearchRequest::new(query, category, options)
        .build()
        .expect("request should build")
}

#[cfg(test)]
mod validation {
    use super::*;

    #[test]
    fn test_blank_query_is_rejected_for_every_category() {
        for category in Category::ALL {
            for query in ["", "   ", "\t\n"] {
                let err = SearchRequest::new(query, category, SearchOptions::new().page(3))
                    .build()
                    .unwrap_err();
                assert!(
                    matches!(err, StartpageError::InvalidRequest(_)),
                    "{category} with {query:?} gave {err:?}"
                );
                assert!(!err.is_retryable());
            }
        }
    }

    #[test]
    fn test_query_is_trimmed_and_offset_is_zero_indexed() {
        let params = build(
            "  cats  ",
            Category::Web,
            SearchOptions::new().page(2).results_per_page(10),
        );
        assert_eq!(params.get("query"), Some("cats"));
        assert_eq!(params.get("startat"), Some("10"));
        assert_eq!(params.get("num"), Some("10"));
        assert_eq!(params.get("cmd"), Some("process_search"));
        assert_eq!(params.get("cat"), Some("web"));
    }

    #[test]
    fn test_page_zero_is_treated_as_first_page() {
        let params = build("cats", Category::Web, SearchOptions::new().page(0));
        assert_eq!(params.get("startat"), Some("0"));
    }
}

#[cfg(test)]
mod category_rules {
    use super::*;

    #[test]
    fn test_wire_codes() {
        let codes: Vec<_> = Category::ALL
            .iter()
            .map(|c| build("q", *c, SearchOptions::new()).get("cat").map(str::to_string))
            .collect();
        assert_eq!(
            codes,
            ["web", "pics", "video", "news", "map"]
                .map(|c| Some(c.to_string()))
                .to_vec()
        );
    }

    #[test]
    fn test_page_size_only_sent_for_web() {
        for category in [Category::Images, Category::Videos, Category::News, Category::Places] {
            let params = build("q", category, SearchOptions::new().results_per_page(50));
            assert!(!params.contains("num"), "{category} should not send num");
        }
    }

    #[test]
    fn test_images_default_page_size_drives_offset() {
        let params = build("q", Category::Images, SearchOptions::new().page(3));
        assert_eq!(params.get("startat"), Some("40"));
    }

    #[test]
    fn test_safe_search_skipped_for_news_and_places() {
        let options = SearchOptions::new().safe_search("strict");
        assert_eq!(build("q", Category::Web, options.clone()).get("ff"), Some("1"));
        assert_eq!(build("q", Category::Images, options.clone()).get("ff"), Some("1"));
        assert_eq!(build("q", Category::Videos, options.clone()).get("ff"), Some("1"));
        assert!(!build("q", Category::News, options.clone()).contains("ff"));
        assert!(!build("q", Category::Places, options).contains("ff"));
    }

    #[test]
    fn test_default_safe_search_is_moderate() {
        assert_eq!(build("q", Category::Web, SearchOptions::new()).get("ff"), Some("0"));
    }

    #[test]
    fn test_time_filter_only_for_web_videos_news() {
        let options = SearchOptions::new().time_filter("week");
        assert_eq!(build("q", Category::Web, options.clone()).get("with_date"), Some("w"));
        assert_eq!(build("q", Category::Videos, options.clone()).get("with_date"), Some("w"));
        assert_eq!(build("q", Category::News, options.clone()).get("with_date"), Some("w"));
        assert!(!build("q", Category::Images, options.clone()).contains("with_date"));
        assert!(!build("q", Category::Places, options).contains("with_date"));
    }

    #[test]
    fn test_time_filter_any_is_not_sent() {
        let params = build("q", Category::Web, SearchOptions::new().time_filter("any"));
        assert!(!params.contains("with_date"));
    }

    #[test]
    fn test_size_only_for_images() {
        let options = SearchOptions::new().size("large");
        assert_eq!(build("q", Category::Images, options.clone()).get("size"), Some("l"));
        assert!(!build("q", Category::Web, options.clone()).contains("size"));
        let any = build("q", Category::Images, SearchOptions::new().size("any"));
        assert!(!any.contains("size"));
    }

    #[test]
    fn test_duration_only_for_videos() {
        let options = SearchOptions::new().duration("long");
        assert_eq!(build("q", Category::Videos, options.clone()).get("duration"), Some("l"));
        assert!(!build("q", Category::Images, options).contains("duration"));
    }

    #[test]
    fn test_geo_only_for_places() {
        let options = SearchOptions::new().location(48.8566, 2.3522).radius(500);
        let places = build("cafe", Category::Places, options.clone());
        assert_eq!(places.get("latitude"), Some("48.8566"));
        assert_eq!(places.get("longitude"), Some("2.3522"));
        assert_eq!(places.get("radius"), Some("500"));

        let web = build("cafe", Category::Web, options);
        assert!(!web.contains("latitude"));
        assert!(!web.contains("radius"));
    }

    #[test]
    fn test_latitude_without_longitude_is_ignored() {
        let mut options = SearchOptions::new().radius(100);
        options.latitude = Some(1.5);
        let params = build("cafe", Category::Places, options);
        assert!(!params.contains("latitude"));
        assert!(!params.contains("longitude"));
        assert_eq!(params.get("radius"), Some("100"));
    }
}

#[cfg(test)]
mod lookups {
    use super::*;

    #[test]
    fn test_language_and_region_tables() {
        let params = build(
            "q",
            Category::Web,
            SearchOptions::new().language("german").region("uk"),
        );
        assert_eq!(params.get("language"), Some("de"));
        assert_eq!(params.get("lui"), Some("de"));
        assert_eq!(params.get("pl"), Some("uk"));
    }

    #[test]
    fn test_unknown_values_pass_through() {
        assert_eq!(endpoints::language_code("klingon"), "klingon");
        assert_eq!(endpoints::region_code("br"), "br");
        assert_eq!(endpoints::safe_search_level("custom"), "custom");
        assert_eq!(endpoints::time_filter("2d"), "2d");
        assert_eq!(endpoints::image_size("icon"), "icon");
        assert_eq!(endpoints::video_duration("feature"), "feature");
        assert_eq!(endpoints::advanced_param("sitesearch"), "sitesearch");
    }

    #[test]
    fn test_known_values_are_mapped() {
        assert_eq!(endpoints::safe_search_level("off"), "2");
        assert_eq!(endpoints::time_filter("year"), "y");
        assert_eq!(endpoints::image_size("wallpaper"), "w");
        assert_eq!(endpoints::video_duration("short"), "s");
        assert_eq!(endpoints::advanced_param("ad_block_plus"), "abp");
        assert_eq!(endpoints::advanced_param("time_filter"), "with_date");
    }
}

#[cfg(test)]
mod extras {
    use super::*;

    #[test]
    fn test_extras_override_computed_values() {
        let params = build(
            "q",
            Category::Web,
            SearchOptions::new().extra("cat", "custom").extra("abp", "1"),
        );
        assert_eq!(params.get("cat"), Some("custom"));
        assert_eq!(params.get("abp"), Some("1"));
        // Overridden keys stay where they were; new keys go last.
        assert_eq!(params.pairs()[1].0, "cat");
        assert_eq!(params.pairs().last().map(|(k, _)| k.as_str()), Some("abp"));
    }

    #[test]
    fn test_parameter_set_replaces_in_place() {
        let mut params = ParameterSet::new();
        params.set("a", "1");
        params.set("b", "2");
        params.set("a", "3");
        assert_eq!(params.len(), 2);
        assert_eq!(
            params.pairs(),
            &[
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }
}
