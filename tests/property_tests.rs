//! Property-based tests for gcp_logger_system using proptest

use gcp_logger_system::prelude::*;
use gcp_logger_system::compile;
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn group_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_filter("collides with a default key", |name| {
        !["time", "severity", "message"].contains(&name.as_str())
    })
}

fn options(min_level: LogLevel) -> HandlerOptions {
    HandlerOptions::builder().min_level(min_level).build()
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that parsing ignores case and surrounding whitespace
    #[test]
    fn test_log_level_parse_case_insensitive(level in any_level(), pad in 0usize..3) {
        let input = format!("{}{}{}", " ".repeat(pad), level.to_str().to_lowercase(), " ".repeat(pad));
        prop_assert_eq!(input.parse::<LogLevel>(), Ok(level));
    }

    /// Invalid strings never parse
    #[test]
    fn test_log_level_invalid(s in "[a-z]{6,12}") {
        prop_assume!(!["trace", "debug", "info", "warn", "warning", "error", "fatal"].contains(&s.as_str()));
        prop_assert!(s.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Every level maps to one of the Cloud Logging severities in use
    #[test]
    fn test_severity_total(level in any_level()) {
        let severity = Severity::from(level);
        prop_assert!(["DEFAULT", "DEBUG", "INFO", "WARNING", "ERROR"].contains(&severity.as_str()));
    }

    /// The severity in a document depends only on the level
    #[test]
    fn test_severity_ignores_attrs(level in any_level(), n in 0i64..5) {
        let attrs: Vec<Attr> = (0..n).map(|i| Attr::new(format!("k{}", i), i)).collect();
        let with_attrs = compile(&ScopeChain::root(), LogEntry::new(level, "m").with_attrs(attrs), &options(LogLevel::Trace)).unwrap();
        let bare = compile(&ScopeChain::root(), LogEntry::new(level, "m"), &options(LogLevel::Trace)).unwrap();
        prop_assert_eq!(with_attrs.get("severity"), bare.get("severity"));
    }

    /// Records pass the gate exactly when their level reaches the minimum
    #[test]
    fn test_level_gate(level in any_level(), min in any_level()) {
        let document = compile(&ScopeChain::root(), LogEntry::new(level, "m"), &options(min));
        prop_assert_eq!(document.is_some(), level >= min);
    }
}

// ============================================================================
// Attribute Tests
// ============================================================================

proptest! {
    /// The last value written for a key at one level wins
    #[test]
    fn test_last_write_wins(values in prop::collection::vec(any::<i64>(), 1..10)) {
        let scope = ScopeChain::root().with_attrs(values.iter().map(|v| Attr::new("k", *v)));
        let document = compile(&scope, LogEntry::new(LogLevel::Info, "m"), &HandlerOptions::default()).unwrap();
        prop_assert_eq!(document.get("k"), Some(&serde_json::json!(values[values.len() - 1])));
    }

    /// Call-site attributes override scope attributes with the same key
    #[test]
    fn test_call_site_overrides_scope(scoped in any::<i64>(), call in any::<i64>()) {
        let scope = ScopeChain::root().with_attrs([Attr::new("k", scoped)]);
        let entry = LogEntry::new(LogLevel::Info, "m").with_attr(Attr::new("k", call));
        let document = compile(&scope, entry, &HandlerOptions::default()).unwrap();
        prop_assert_eq!(document.get("k"), Some(&serde_json::json!(call)));
    }

    /// Groups that end up with no fields never appear
    #[test]
    fn test_empty_groups_elided(names in prop::collection::vec(group_name(), 1..6)) {
        let scope = names.iter().fold(ScopeChain::root(), |scope, name| scope.with_group(name.clone()));
        let document = compile(&scope, LogEntry::new(LogLevel::Info, "m"), &HandlerOptions::default()).unwrap();
        prop_assert!(document.get(&names[0]).is_none());
        prop_assert_eq!(document.as_map().len(), 3);
    }

    /// Attributes inside a group chain land at the innermost group
    #[test]
    fn test_attrs_nest_under_groups(names in prop::collection::vec(group_name(), 1..6), v in any::<i64>()) {
        let scope = names.iter().fold(ScopeChain::root(), |scope, name| scope.with_group(name.clone()));
        let entry = LogEntry::new(LogLevel::Info, "m").with_attr(Attr::new("v", v));
        let document = compile(&scope, entry, &HandlerOptions::default()).unwrap().into_value();

        let mut node = &document;
        for name in &names {
            node = &node[name];
        }
        prop_assert_eq!(&node["v"], &serde_json::json!(v));
    }

    /// An `error` inside any group never turns the record into an error report
    #[test]
    fn test_grouped_error_never_reports(group in group_name(), msg in "[ -~]{0,20}") {
        let scope = ScopeChain::root().with_group(group.clone());
        let entry = LogEntry::new(LogLevel::Error, "m").with_attr(Attr::new("error", msg.clone()));
        let document = compile(&scope, entry, &HandlerOptions::default()).unwrap();
        prop_assert!(!document.is_error_report());
        prop_assert_eq!(document.get("message"), Some(&serde_json::json!("m")));
    }

    /// A root `error` string always becomes the message
    #[test]
    fn test_root_error_reports(msg in "[ -~]{0,20}") {
        let entry = LogEntry::new(LogLevel::Error, "m").with_attr(Attr::new("error", msg.clone()));
        let document = compile(&ScopeChain::root(), entry, &HandlerOptions::default()).unwrap();
        prop_assert!(document.is_error_report());
        prop_assert_eq!(document.get("message"), Some(&serde_json::json!(msg)));
    }
}
