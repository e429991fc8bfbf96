//! # Notification payload construction.
//!
//! A payload is the configured static template with the event's wire label
//! inserted under `event_type` (overwriting any template value of that key).
//! Construction is pure: the same template and event kind always produce the
//! same JSON body, no matter how often it is repeated.

use serde_json::{Map, Value};

use crate::events::EventKind;

/// Builds the notification body for one event.
pub fn build_payload(template: &Map<String, Value>, kind: &EventKind) -> Value {
    let mut body = template.clone();
    body.insert(
        "event_type".to_string(),
        Value::String(kind.label().to_string()),
    );
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> Map<String, Value> {
        let Value::Object(map) = json!({ "device": "pet-01", "room": 3 }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn test_payload_is_deterministic() {
        let tpl = template();
        let a = build_payload(&tpl, &EventKind::Touch);
        let b = build_payload(&tpl, &EventKind::Touch);
        assert_eq!(a, b);
        assert_eq!(a, json!({ "device": "pet-01", "room": 3, "event_type": "TOUCH" }));
    }

    #[test]
    fn test_event_type_overwrites_template_key() {
        let Value::Object(tpl) = json!({ "event_type": "stale" }) else {
            unreachable!()
        };
        let body = build_payload(&tpl, &EventKind::NoiseDetected { rms: 2500.0 });
        assert_eq!(body["event_type"], "NOISE_DETECTED");
    }

    #[test]
    fn test_measurements_do_not_leak_into_body() {
        // The wire shape is fixed: template fields plus event_type only.
        let body = build_payload(&Map::new(), &EventKind::ProximityDetected { distance_cm: 7.5 });
        assert_eq!(body, json!({ "event_type": "PROXIMITY_DETECTED" }));
    }
}
