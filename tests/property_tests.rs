use proptest::prelude::*;
use request_schema::*;
use serde_json::{Map, Value, json};

fn field_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn field_spec() -> impl Strategy<Value = FieldSpec> {
    (
        any::<bool>(),
        proptest::option::of(proptest::sample::select(ValueKind::ALL.to_vec())),
        proptest::option::of(1usize..20),
    )
        .prop_map(|(required, kind, max)| {
            let mut spec = FieldSpec::new();
            if required {
                spec = spec.required();
            }
            if let Some(kind) = kind {
                spec = spec.with_type(kind);
            }
            if let Some(max) = max {
                spec = spec.with_max_length(max);
            }
            spec
        })
}

fn schema() -> impl Strategy<Value = Schema> {
    proptest::collection::vec((field_name(), field_spec()), 0..6).prop_map(|fields| {
        fields
            .into_iter()
            .fold(Schema::new(), |schema, (name, spec)| schema.with_field(name, spec))
    })
}

proptest! {
    #[test]
    fn empty_object_yields_exactly_one_error(schema in schema()) {
        for place in [Place::body(), Place::params(), Place::query()] {
            let errors = check(&json!({}), &schema, &place);
            prop_assert_eq!(errors.len(), 1);
            prop_assert_eq!(errors[0].msg.as_str(), "Empty object now allowed");
            prop_assert_eq!(errors[0].param.as_deref(), None);
        }
    }

    #[test]
    fn missing_required_fields_are_undefined(schema in schema(), extra in "[A-Z]{1,4}") {
        // Upper-case keys never collide with generated field names.
        let mut data = Map::new();
        data.insert(extra, json!(1));
        let errors = check(&Value::Object(data), &schema, &Place::params());

        let required: Vec<&str> = schema
            .fields()
            .filter(|(_, spec)| spec.is_required())
            .map(|(name, _)| name)
            .collect();
        let undefined: Vec<&str> = errors
            .iter()
            .filter(|error| error.msg == "value is undefined")
            .filter_map(|error| error.param.as_deref())
            .collect();

        prop_assert_eq!(errors.len(), required.len());
        prop_assert_eq!(undefined, required);
    }

    #[test]
    fn whitelist_reports_every_unknown_key(keys in proptest::collection::btree_set("[a-z]{1,6}", 1..8)) {
        let schema = Schema::new().with_allowed_props(["keep"]);
        let data: Map<String, Value> = keys.iter().map(|k| (k.clone(), json!(true))).collect();

        let errors = check(&Value::Object(data), &schema, &Place::body());
        let forbidden: Vec<&str> = errors.iter().filter_map(|e| e.param.as_deref()).collect();
        let expected: Vec<&str> = keys.iter().map(String::as_str).filter(|k| *k != "keep").collect();

        prop_assert_eq!(forbidden, expected);
        prop_assert!(errors.iter().all(|e| e.msg == "forbidden property"));
    }

    #[test]
    fn max_length_matches_utf16_units(text in "\\PC{0,30}", max in 1usize..30) {
        let schema = Schema::new().with_field(
            "text",
            FieldSpec::new().with_type(ValueKind::String).with_max_length(max),
        );
        let errors = check(&json!({ "text": text.clone() }), &schema, &Place::body());

        let too_long = text.encode_utf16().count() > max;
        prop_assert_eq!(errors.len(), usize::from(too_long));
    }
}
