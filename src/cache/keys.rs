//! Deterministic cache key construction.
//!
//! Invalidation is tag-based rather than key-pattern-based, so keys only
//! need to be unique per distinct logical request and stable across calls
//! and process restarts. They are readable templated strings, not hashes.

use serde_json::Value;

pub struct CacheKeyGenerator;

impl CacheKeyGenerator {
  /// Key for an arbitrary method call: `{class}:{method}[:{arg}...]`.
  ///
  /// Object arguments are serialized with their keys sorted, so two
  /// structurally equal objects produce the same key regardless of
  /// insertion order.
  pub fn for_method(class: &str, method: &str, args: &[Value]) -> String {
    let mut key = format!("{}:{}", class, method);
    for arg in args {
      key.push(':');
      key.push_str(&stringify_arg(arg));
    }
    key
  }

  pub fn task(id: &str) -> String {
    format!("task:{}", id)
  }

  pub fn task_comments(id: &str) -> String {
    format!("task:{}:comments", id)
  }

  pub fn task_attachments(id: &str) -> String {
    format!("task:{}:attachments", id)
  }

  pub fn department_tickets(department: &str, status: Option<&str>) -> String {
    match status {
      Some(status) => format!("department:{}:tickets:{}", department, status),
      None => format!("department:{}:tickets", department),
    }
  }

  pub fn department_stats() -> String {
    "departments:stats".to_string()
  }
}

/// Stringify one argument by a stable rule: null becomes the empty string,
/// scalars use their display form, arrays and objects serialize as
/// canonical JSON.
fn stringify_arg(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => n.to_string(),
    Value::Array(_) | Value::Object(_) => serde_json::to_string(&canonicalize(value))
      .unwrap_or_else(|_| type_tag(value).to_string()),
  }
}

/// Rebuild a value with all object keys sorted lexicographically, at every
/// nesting level.
fn canonicalize(value: &Value) -> Value {
  match value {
    Value::Object(map) => {
      let mut pairs: Vec<(&String, &Value)> = map.iter().collect();
      pairs.sort_by_key(|(k, _)| *k);
      let mut out = serde_json::Map::new();
      for (k, v) in pairs {
        out.insert(k.clone(), canonicalize(v));
      }
      Value::Object(out)
    }
    Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
    other => other.clone(),
  }
}

fn type_tag(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_key_without_args() {
    assert_eq!(CacheKeyGenerator::for_method("C", "m", &[]), "C:m");
  }

  #[test]
  fn test_scalar_args() {
    assert_eq!(
      CacheKeyGenerator::for_method("C", "m", &[json!("id-1"), json!(7), json!(true)]),
      "C:m:id-1:7:true"
    );
  }

  #[test]
  fn test_null_arg_is_empty_string() {
    assert_eq!(
      CacheKeyGenerator::for_method("C", "m", &[json!(null), json!("x")]),
      "C:m::x"
    );
  }

  #[test]
  fn test_object_key_order_does_not_affect_key() {
    let ordered = CacheKeyGenerator::for_method("C", "m", &[json!({"a": 1, "b": 2})]);
    let reversed = CacheKeyGenerator::for_method("C", "m", &[json!({"b": 2, "a": 1})]);
    assert_eq!(ordered, reversed);
  }

  #[test]
  fn test_nested_objects_are_canonicalized() {
    let a = CacheKeyGenerator::for_method("C", "m", &[json!({"outer": {"b": 2, "a": 1}})]);
    let b = CacheKeyGenerator::for_method("C", "m", &[json!({"outer": {"a": 1, "b": 2}})]);
    assert_eq!(a, b);
  }

  #[test]
  fn test_distinct_args_produce_distinct_keys() {
    let a = CacheKeyGenerator::for_method("C", "m", &[json!({"a": 1})]);
    let b = CacheKeyGenerator::for_method("C", "m", &[json!({"a": 2})]);
    assert_ne!(a, b);
  }

  #[test]
  fn test_entity_keys() {
    assert_eq!(CacheKeyGenerator::task("42"), "task:42");
    assert_eq!(CacheKeyGenerator::task_comments("42"), "task:42:comments");
    assert_eq!(
      CacheKeyGenerator::task_attachments("42"),
      "task:42:attachments"
    );
    assert_eq!(
      CacheKeyGenerator::department_tickets("support", None),
      "department:support:tickets"
    );
    assert_eq!(
      CacheKeyGenerator::department_tickets("support", Some("open")),
      "department:support:tickets:open"
    );
    assert_eq!(CacheKeyGenerator::department_stats(), "departments:stats");
  }
}
