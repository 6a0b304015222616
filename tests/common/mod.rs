use request_schema::*;
use serde_json::json;

#[allow(dead_code)]
pub fn user_schema() -> Schema {
    Schema::from_value(&json!({
        "email": { "required": true, "type": "string", "isEmail": true },
        "name": { "required": true, "type": "string", "minStringLength": 2, "maxStringLength": 40 },
        "age": { "type": "number" },
        "role": { "equals": ["admin", "editor", "viewer"] },
        "birthday": { "type": "date" },
        "tags": { "type": "array", "arrayElementType": "string" },
        "address": {
            "type": "object",
            "_store": {
                "city": { "required": true, "type": "string" },
                "zip": { "regexp": "^\\d{5}$" }
            }
        }
    }))
    .unwrap()
}

#[allow(dead_code)]
pub fn valid_user() -> serde_json::Value {
    json!({
        "email": "user.name+tag@sub.example.com",
        "name": "Ada",
        "age": "42",
        "role": "editor",
        "birthday": "1990-04-12",
        "tags": ["a", "b"],
        "address": { "city": "Paris", "zip": "75001" }
    })
}

#[allow(dead_code)]
pub fn messages(errors: &[ValidationError]) -> Vec<&str> {
    errors.iter().map(|error| error.msg.as_str()).collect()
}
