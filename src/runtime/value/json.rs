//! Building values from JSON
//!
//! Used by the command-line front end to describe data without a reader:
//!
//! - `null` → `()`, booleans → `#t`/`#f`
//! - integers → exact integers, other numbers → flonums
//! - `"'name"` → the symbol `name`, `"#\\c"` → the character `c`,
//!   any other string → a string
//! - arrays → proper lists
//! - objects → association lists with symbol keys

use serde_json::Value as Json;

use super::heap::Heap;
use super::runtime_value::Value;

impl Heap {
    /// Convert a JSON document into a runtime value
    pub fn from_json(
        &mut self,
        json: &Json,
    ) -> Value {
        match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    self.integer(u)
                } else {
                    self.flonum(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => self.string_from_json(s),
            Json::Array(items) => {
                let items: Vec<Value> = items.iter().map(|item| self.from_json(item)).collect();
                self.list(items)
            }
            Json::Object(entries) => {
                let pairs: Vec<Value> = entries
                    .iter()
                    .map(|(key, value)| {
                        let key = self.intern(key);
                        let value = self.from_json(value);
                        self.cons(key, value)
                    })
                    .collect();
                self.list(pairs)
            }
        }
    }

    fn string_from_json(
        &mut self,
        s: &str,
    ) -> Value {
        if let Some(name) = s.strip_prefix('\'') {
            if !name.is_empty() {
                return self.intern(name);
            }
        }
        if let Some(rest) = s.strip_prefix("#\\") {
            let mut chars = rest.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Value::Char(c);
            }
        }
        self.string(s)
    }
}
