use serde::Serialize;
use serde_json::Value;

pub const SEND_PATH: &str = "/send";
pub const REQUIRED_FIELDS: [&str; 3] = ["to", "subject", "text"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
  pub to: String,
  pub subject: String,
  pub text: String,
}

impl SendRequest {
  /// Pulls the three fields out of a decoded body.
  ///
  /// On failure returns the keys the body did carry, in the order they were
  /// sent. A field only counts when it is a non-empty string.
  pub fn from_json(body: &Value) -> Result<Self, Vec<String>> {
    let object = match body.as_object() {
      Some(object) => object,
      None => return Err(Vec::new()),
    };

    let field = |name: &str| {
      object
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
    };

    match (field("to"), field("subject"), field("text")) {
      (Some(to), Some(subject), Some(text)) => Ok(SendRequest { to, subject, text }),
      _ => Err(object.keys().cloned().collect()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
  pub ok: bool,
  pub message_id: String,
  pub message: String,
}

impl SendResponse {
  pub fn sent(message_id: String) -> Self {
    SendResponse {
      ok: true,
      message_id,
      message: "Email sent successfully".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
  pub status: String,
  pub message: String,
  pub endpoint: String,
  pub methods: Vec<String>,
}

impl Default for HealthResponse {
  fn default() -> Self {
    HealthResponse {
      status: "running".to_string(),
      message: "Email relay server".to_string(),
      endpoint: SEND_PATH.to_string(),
      methods: vec!["POST".to_string()],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_from_json_complete() {
    let body = json!({ "to": "a@x.com", "subject": "Hi", "text": "hello" });
    let request = SendRequest::from_json(&body).unwrap();
    assert_eq!(request.to, "a@x.com");
    assert_eq!(request.subject, "Hi");
    assert_eq!(request.text, "hello");
  }

  #[test]
  fn test_from_json_reports_received_keys_in_order() {
    let body = json!({ "to": "a@x.com", "subject": "Hi" });
    assert_eq!(
      SendRequest::from_json(&body),
      Err(vec!["to".to_string(), "subject".to_string()])
    );
  }

  #[test]
  fn test_from_json_empty_and_non_string_fields_are_missing() {
    let body = json!({ "to": "a@x.com", "subject": "", "text": 42 });
    assert_eq!(
      SendRequest::from_json(&body),
      Err(vec!["to".to_string(), "subject".to_string(), "text".to_string()])
    );
  }

  #[test]
  fn test_from_json_non_object() {
    assert_eq!(SendRequest::from_json(&json!(["to", "subject"])), Err(vec![]));
    assert_eq!(SendRequest::from_json(&Value::Null), Err(vec![]));
  }

  #[test]
  fn test_send_response_uses_camel_case() {
    let value = serde_json::to_value(SendResponse::sent("<id@x.com>".to_string())).unwrap();
    assert_eq!(
      value,
      json!({ "ok": true, "messageId": "<id@x.com>", "message": "Email sent successfully" })
    );
  }
}
