//! Outcome wrapper conventions.
//!
//! The SDK wraps operation results in outcome objects under two naming
//! conventions (`IsSuccess`/`Value`/`Error` and `Success`/`Value`/`Errors`).
//! Each convention is a concrete adapter rather than open-ended structural
//! probing, so normalization behavior stays closed and testable.

use crate::value::SdkValue;

/// Reads an outcome wrapper under one naming convention.
pub trait OutcomeConvention {
    /// Returns the success flag if `value` is a wrapper of this convention.
    fn success_flag(&self, value: &SdkValue) -> Option<bool>;

    /// Returns the wrapped value (may be absent even on success).
    fn value<'a>(&self, wrapper: &'a SdkValue) -> Option<&'a SdkValue>;

    /// Collects the failure message(s) carried by the wrapper.
    fn failures(&self, wrapper: &SdkValue) -> Vec<String>;
}

fn collect_failures(wrapper: &SdkValue, primary: &str, secondary: &str) -> Vec<String> {
    let mut messages = Vec::new();
    for key in [primary, secondary] {
        match wrapper.get(key) {
            Some(SdkValue::Text(message)) => messages.push(message.clone()),
            Some(SdkValue::List(items)) => {
                messages.extend(items.iter().filter_map(|v| v.as_text().map(str::to_string)));
            }
            _ => {}
        }
    }
    messages
}

/// The `IsSuccess` / `Value` / `Error` convention.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsSuccessConvention;

impl OutcomeConvention for IsSuccessConvention {
    fn success_flag(&self, value: &SdkValue) -> Option<bool> {
        value.get("IsSuccess")?.as_bool()
    }

    fn value<'a>(&self, wrapper: &'a SdkValue) -> Option<&'a SdkValue> {
        wrapper.get("Value")
    }

    fn failures(&self, wrapper: &SdkValue) -> Vec<String> {
        collect_failures(wrapper, "Error", "Errors")
    }
}

/// The `Success` / `Value` / `Errors` convention.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuccessConvention;

impl OutcomeConvention for SuccessConvention {
    fn success_flag(&self, value: &SdkValue) -> Option<bool> {
        value.get("Success")?.as_bool()
    }

    fn value<'a>(&self, wrapper: &'a SdkValue) -> Option<&'a SdkValue> {
        wrapper.get("Value")
    }

    fn failures(&self, wrapper: &SdkValue) -> Vec<String> {
        collect_failures(wrapper, "Errors", "Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_success_convention_reads_flag_and_error() {
        let wrapper = SdkValue::map([
            ("IsSuccess".to_string(), SdkValue::Bool(false)),
            ("Error".to_string(), SdkValue::text("boom")),
        ]);
        let convention = IsSuccessConvention;
        assert_eq!(convention.success_flag(&wrapper), Some(false));
        assert_eq!(convention.failures(&wrapper), ["boom"]);
    }

    #[test]
    fn success_convention_reads_error_list() {
        let wrapper = SdkValue::map([
            ("Success".to_string(), SdkValue::Bool(false)),
            (
                "Errors".to_string(),
                SdkValue::List(vec![SdkValue::text("one"), SdkValue::text("two")]),
            ),
        ]);
        let convention = SuccessConvention;
        assert_eq!(convention.success_flag(&wrapper), Some(false));
        assert_eq!(convention.failures(&wrapper), ["one", "two"]);
    }

    #[test]
    fn non_wrapper_has_no_flag() {
        let convention = IsSuccessConvention;
        assert_eq!(convention.success_flag(&SdkValue::Integer(1)), None);
        let plain_map = SdkValue::map([("Count".to_string(), SdkValue::Integer(1))]);
        assert_eq!(convention.success_flag(&plain_map), None);
    }
}
