use super::*;
use serde_json::json;

fn devices() -> Vec<Value> {
    vec![
        json!({
            "uid": "d1",
            "hostname": "DESKTOP-1",
            "online": true,
            "deviceType": {"category": "Desktop"},
            "patchManagement": {"patchesInstalled": 120, "patchesApprovedPending": 3},
            "intIpAddress": "10.0.0.15",
            "lastUser": "acme\\alice",
        }),
        json!({
            "uid": "d2",
            "hostname": "SERVER-1",
            "online": false,
            "deviceType": {"category": "Server"},
            "patchManagement": {"patchesInstalled": 80, "patchesApprovedPending": 0},
            "intIpAddress": "10.0.1.2",
            "lastUser": "",
        }),
        json!({
            "uid": "d3",
            "hostname": "LAPTOP-7",
            "online": true,
            "deviceType": null,
            "patchManagement": {"patchesInstalled": "n/a"},
            "intIpAddress": null,
        }),
    ]
}

fn uids(records: &[Value]) -> Vec<&str> {
    records.iter().map(|r| r["uid"].as_str().unwrap()).collect()
}

fn cond(field: &str, operator: &str) -> FilterCondition {
    FilterCondition::new(field, Operator::from(operator))
}

#[cfg(test)]
mod validate_tests {
    use super::*;

    #[test]
    fn drops_entries_missing_field_or_operator() {
        let conditions = validate(&json!([
            {"field": "a", "operator": "x"},
            {"foo": "bar"},
        ]));
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].field, "a");
        assert_eq!(conditions[0].operator, Operator::Unknown("x".to_string()));
    }

    #[test]
    fn drops_empty_or_non_string_keys() {
        let conditions = validate(&json!([
            {"field": "", "operator": "equals"},
            {"field": "hostname", "operator": ""},
            {"field": 5, "operator": "equals"},
            {"field": "hostname"},
            {"operator": "equals"},
            "not an object",
        ]));
        assert!(conditions.is_empty());
    }

    #[test]
    fn non_array_input_yields_nothing() {
        assert!(validate(&json!({"field": "a", "operator": "equals"})).is_empty());
        assert!(validate(&Value::Null).is_empty());
        assert!(validate(&json!("equals")).is_empty());
    }

    #[test]
    fn operands_are_coerced_into_their_slot() {
        let conditions = validate(&json!([
            {"field": "a", "operator": "equals", "value": "X", "numericValue": 2.5, "booleanValue": false},
            {"field": "b", "operator": "greaterThan", "numericValue": "10"},
            {"field": "c", "operator": "equals", "value": 42, "booleanValue": "true"},
            {"field": "d", "operator": "isEmpty", "value": null},
        ]));

        assert_eq!(conditions.len(), 4);
        assert_eq!(conditions[0].value.as_deref(), Some("X"));
        assert_eq!(conditions[0].numeric_value, Some(2.5));
        assert_eq!(conditions[0].boolean_value, Some(false));
        assert_eq!(conditions[1].numeric_value, Some(10.0));
        assert_eq!(conditions[1].value, None);
        assert_eq!(conditions[2].value.as_deref(), Some("42"));
        assert_eq!(conditions[2].boolean_value, Some(true));
        assert_eq!(conditions[3].value, None);
    }

    #[test]
    fn string_operands_behave_like_typed_ones() {
        let records = vec![
            json!({"uid": "a", "online": true, "flags": "0x1A"}),
            json!({"uid": "b", "online": false, "flags": "0x02"}),
        ];
        let by_string = validate(&json!([
            {"field": "online", "operator": "equals", "booleanValue": "true"},
            {"field": "flags", "operator": "greaterThan", "numericValue": "0x10"}
        ]));
        let typed = validate(&json!([
            {"field": "online", "operator": "equals", "booleanValue": true},
            {"field": "flags", "operator": "greaterThan", "numericValue": 16}
        ]));

        assert_eq!(by_string, typed);
        let kept = apply(records, &by_string, CombineMode::And);
        assert_eq!(uids(&kept), vec!["a"]);
    }

    #[test]
    fn combine_mode_parsing() {
        assert_eq!("AND".parse::<CombineMode>(), Ok(CombineMode::And));
        assert_eq!("or".parse::<CombineMode>(), Ok(CombineMode::Or));
        assert!("XOR".parse::<CombineMode>().is_err());
        assert_eq!(CombineMode::default(), CombineMode::And);
    }
}

#[cfg(test)]
mod apply_tests {
    use super::*;

    #[test]
    fn empty_conditions_is_identity() {
        let records = devices();
        assert_eq!(apply(records.clone(), &[], CombineMode::And), records);
        assert_eq!(apply(records.clone(), &[], CombineMode::Or), records);
    }

    #[test]
    fn boolean_equals_scenario() {
        let records = vec![
            json!({"hostname": "DESKTOP-1", "online": true}),
            json!({"hostname": "SERVER-1", "online": false}),
        ];
        let conditions = validate(&json!([
            {"field": "online", "operator": "equals", "booleanValue": true}
        ]));

        assert_eq!(
            apply(records, &conditions, CombineMode::And),
            vec![json!({"hostname": "DESKTOP-1", "online": true})]
        );
    }

    #[test]
    fn nested_field_scenario() {
        let condition = cond("deviceType.category", "equals").with_value("Desktop");
        assert!(condition.matches(&json!({"deviceType": {"category": "Desktop"}})));
        assert!(!condition.matches(&json!({"deviceType": null})));
        assert!(!condition.matches(&json!({"deviceType": "Desktop"})));
        assert!(!condition.matches(&json!({})));
    }

    #[test]
    fn and_requires_all_or_requires_any() {
        let conditions = vec![
            cond("online", "equals").with_boolean_value(true),
            cond("hostname", "startsWith").with_value("server"),
        ];

        assert!(apply(devices(), &conditions, CombineMode::And).is_empty());
        assert_eq!(
            uids(&apply(devices(), &conditions, CombineMode::Or)),
            vec!["d1", "d2", "d3"]
        );

        let conditions = vec![
            cond("online", "equals").with_boolean_value(true),
            cond("hostname", "contains").with_value("desk"),
        ];
        assert_eq!(uids(&apply(devices(), &conditions, CombineMode::And)), vec!["d1"]);
    }

    #[test]
    fn apply_is_idempotent_and_stable() {
        let conditions = vec![cond("patchManagement.patchesInstalled", "greaterThan")
            .with_numeric_value(50.0)];
        let once = apply(devices(), &conditions, CombineMode::And);
        let twice = apply(once.clone(), &conditions, CombineMode::And);

        assert_eq!(uids(&once), vec!["d1", "d2"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_regex_never_matches() {
        let conditions = validate(&json!([
            {"field": "hostname", "operator": "regex", "value": "["}
        ]));
        assert!(apply(devices(), &conditions, CombineMode::And).is_empty());
        assert!(apply(devices(), &conditions, CombineMode::Or).is_empty());
    }

    #[test]
    fn filter_set_wraps_mode() {
        let set = FilterSet::from_raw(
            &json!([
                {"field": "deviceType.category", "operator": "equals", "value": "server"},
                {"field": "hostname", "operator": "endsWith", "value": "-7"},
            ]),
            CombineMode::Or,
        );
        assert!(!set.is_empty());
        assert_eq!(uids(&set.apply(devices())), vec!["d2", "d3"]);
        assert_eq!(FilterSet::default().apply(devices()), devices());
    }
}

#[cfg(test)]
mod operator_tests {
    use super::*;

    #[test]
    fn string_comparisons_are_case_insensitive() {
        let record = json!({"hostname": "DESKTOP-1"});
        assert!(cond("hostname", "equals").with_value("desktop-1").matches(&record));
        assert!(cond("hostname", "contains").with_value("SKTOP").matches(&record));
        assert!(cond("hostname", "startsWith").with_value("desk").matches(&record));
        assert!(cond("hostname", "endsWith").with_value("-1").matches(&record));
        assert!(cond("hostname", "notEquals").with_value("server-1").matches(&record));
        assert!(cond("hostname", "notContains").with_value("server").matches(&record));
        assert!(!cond("hostname", "notContains").with_value("top").matches(&record));
    }

    #[test]
    fn non_string_values_compare_by_text() {
        let record = json!({"siteId": 12, "score": 1.5, "tags": ["a", "b"], "udf": {"x": 1}});
        assert!(cond("siteId", "equals").with_value("12").matches(&record));
        assert!(cond("score", "startsWith").with_value("1.").matches(&record));
        assert!(cond("tags", "equals").with_value("a,b").matches(&record));
        assert!(cond("udf", "equals").with_value("[object object]").matches(&record));
    }

    #[test]
    fn boolean_fields_use_boolean_operand() {
        let online = json!({"online": true});
        assert!(cond("online", "equals").with_boolean_value(true).matches(&online));
        assert!(!cond("online", "equals").with_boolean_value(false).matches(&online));
        // The string operand is ignored for boolean fields
        assert!(!cond("online", "equals").with_value("true").matches(&online));
        assert!(cond("online", "notEquals").with_boolean_value(false).matches(&online));
        assert!(cond("online", "notEquals").matches(&online));
        // Other string operators still see the text form
        assert!(cond("online", "contains").with_value("TRU").matches(&online));
    }

    #[test]
    fn missing_and_null_values() {
        let record = json!({"intIpAddress": null});
        for field in ["intIpAddress", "missing", "deviceType.category"] {
            assert!(cond(field, "isEmpty").matches(&record), "{}", field);
            assert!(!cond(field, "isNotEmpty").matches(&record), "{}", field);
            assert!(!cond(field, "notEquals").with_value("x").matches(&record), "{}", field);
            assert!(!cond(field, "notContains").with_value("x").matches(&record), "{}", field);
            assert!(!cond(field, "lessThan").with_numeric_value(5.0).matches(&record), "{}", field);
        }
    }

    #[test]
    fn is_empty_matches_placeholder_strings() {
        for text in ["", "null", "NULL", "undefined"] {
            let record = json!({"lastUser": text});
            assert!(cond("lastUser", "isEmpty").matches(&record), "{:?}", text);
            assert!(!cond("lastUser", "isNotEmpty").matches(&record), "{:?}", text);
        }
        let record = json!({"lastUser": "alice"});
        assert!(cond("lastUser", "isNotEmpty").matches(&record));
        assert!(!cond("lastUser", "isEmpty").matches(&record));
    }

    #[test]
    fn numeric_comparisons() {
        let record = json!({"pending": 3, "text": " 7 ", "word": "n/a", "blank": ""});
        assert!(cond("pending", "greaterThan").with_numeric_value(2.0).matches(&record));
        assert!(!cond("pending", "greaterThan").with_numeric_value(3.0).matches(&record));
        assert!(cond("pending", "greaterThanOrEqual").with_numeric_value(3.0).matches(&record));
        assert!(cond("pending", "lessThanOrEqual").with_numeric_value(3.0).matches(&record));
        assert!(cond("pending", "lessThan").with_numeric_value(10.0).matches(&record));
        // Numeric strings are coerced
        assert!(cond("text", "greaterThan").with_numeric_value(6.5).matches(&record));
        // Non-numeric values never compare
        assert!(!cond("word", "greaterThan").with_numeric_value(-1.0).matches(&record));
        assert!(!cond("word", "lessThan").with_numeric_value(1e9).matches(&record));
        // Radix-prefixed integers are read in their base
        let flags = json!({"hex": "0x1A", "upper": "0X1a", "oct": "0o17", "bin": "0b101", "bad": "0xZZ", "signed": "-0x1A"});
        assert!(cond("hex", "greaterThanOrEqual").with_numeric_value(26.0).matches(&flags));
        assert!(cond("upper", "lessThanOrEqual").with_numeric_value(26.0).matches(&flags));
        assert!(cond("oct", "greaterThan").with_numeric_value(14.0).matches(&flags));
        assert!(cond("bin", "lessThan").with_numeric_value(6.0).matches(&flags));
        assert!(!cond("bad", "greaterThan").with_numeric_value(-1.0).matches(&flags));
        assert!(!cond("signed", "lessThan").with_numeric_value(0.0).matches(&flags));
        // Empty string coerces to zero; missing operand defaults to zero
        assert!(cond("blank", "greaterThanOrEqual").matches(&record));
        assert!(cond("pending", "greaterThan").matches(&record));
    }

    #[test]
    fn regex_is_case_insensitive_on_raw_text() {
        let record = json!({"hostname": "Desktop-042", "ip": "10.0.1.2"});
        assert!(cond("hostname", "regex").with_value("^DESKTOP-\\d+$").matches(&record));
        assert!(cond("ip", "regex").with_value(r"^10\.0\.1\.").matches(&record));
        assert!(!cond("hostname", "regex").with_value("^server").matches(&record));
        assert!(!cond("hostname", "regex").with_value("(unclosed").matches(&record));
        // No pattern at all never matches
        assert!(!cond("hostname", "regex").matches(&record));
    }

    #[test]
    fn unknown_operator_never_matches() {
        let record = json!({"hostname": "DESKTOP-1"});
        assert!(!cond("hostname", "fuzzyMatch").with_value("desktop").matches(&record));
        assert_eq!(Operator::from("fuzzyMatch").name(), "fuzzyMatch");
    }

    #[test]
    fn array_index_segments() {
        let record = json!({"nics": [{"ipv4": "10.0.0.5"}, {"ipv4": "192.168.1.9"}]});
        assert!(cond("nics.1.ipv4", "startsWith").with_value("192.").matches(&record));
        assert!(cond("nics.5.ipv4", "isEmpty").matches(&record));
        assert!(cond("nics.x.ipv4", "isEmpty").matches(&record));
    }
}
