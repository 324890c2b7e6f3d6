//! Decoding of composite sub-records.
//!
//! Several stored functions return child records nested inside a single
//! result row as arrays of delimited text: each array element is one
//! sub-record, brace-delimited with comma-separated fields in a fixed
//! positional order documented at the call site. This module splits a
//! token into its ordered fields; typing the fields (boolean, decimal,
//! identifier) is the mapper's job, driven by the schema of each call.

use crate::error::MappingError;
use rust_decimal::Decimal;

/// Decodes one composite token into its ordered fields.
///
/// The token must carry `{` before `}`; anything outside the braces is
/// ignored. The field count is validated against the call site's schema
/// before anything indexes into the result, so a malformed payload from
/// the database surfaces as a `MappingError` rather than a panic.
pub fn decode(token: &str, expected_fields: usize) -> Result<Vec<String>, MappingError> {
    let inner = match (token.find('{'), token.find('}')) {
        (Some(open), Some(close)) if open < close => &token[open + 1..close],
        _ => {
            return Err(MappingError::Delimiters {
                token: token.to_string(),
            });
        }
    };
    split_fields(inner, expected_fields)
}

/// Splits a token body whose braces were already stripped by the caller.
pub fn split_fields(body: &str, expected_fields: usize) -> Result<Vec<String>, MappingError> {
    let fields: Vec<String> = body.split(',').map(str::to_string).collect();
    if fields.len() != expected_fields {
        return Err(MappingError::FieldCount {
            expected: expected_fields,
            actual: fields.len(),
        });
    }
    Ok(fields)
}

/// Boolean fields use the upstream convention: the literal `true`
/// (case-insensitive) is true, everything else is false.
pub(crate) fn bool_field(fields: &[String], index: usize) -> bool {
    fields[index].eq_ignore_ascii_case("true")
}

pub(crate) fn str_field(fields: &[String], index: usize) -> String {
    fields[index].clone()
}

pub(crate) fn decimal_field(fields: &[String], index: usize) -> Result<Decimal, MappingError> {
    let value = fields[index].trim();
    value.parse::<Decimal>().map_err(|_| MappingError::Field {
        index,
        value: value.to_string(),
        target: "decimal",
    })
}

pub(crate) fn i64_field(fields: &[String], index: usize) -> Result<i64, MappingError> {
    let value = fields[index].trim();
    value.parse::<i64>().map_err(|_| MappingError::Field {
        index,
        value: value.to_string(),
        target: "integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decode_preserves_field_order_without_transformation() {
        let token = "{a,true,ACC1,100.50,false,true,5000.00,BUY,1.1,2.2,3.3,4.4}";
        let fields = decode(token, 12).unwrap();
        assert_eq!(
            fields,
            vec![
                "a", "true", "ACC1", "100.50", "false", "true", "5000.00", "BUY", "1.1", "2.2",
                "3.3", "4.4"
            ]
        );
    }

    #[test]
    fn decode_ignores_text_outside_the_braces() {
        let fields = decode("(\"{x,y}\")", 2).unwrap();
        assert_eq!(fields, vec!["x", "y"]);
    }

    #[test]
    fn missing_closing_brace_is_rejected() {
        let err = decode("{a,b,c", 3).unwrap_err();
        assert!(matches!(err, MappingError::Delimiters { .. }));
    }

    #[test]
    fn reversed_braces_are_rejected() {
        let err = decode("}a,b{", 2).unwrap_err();
        assert!(matches!(err, MappingError::Delimiters { .. }));
    }

    #[test]
    fn field_count_mismatch_is_rejected() {
        let err = decode("{a,b,c}", 12).unwrap_err();
        assert!(matches!(
            err,
            MappingError::FieldCount {
                expected: 12,
                actual: 3
            }
        ));
    }

    #[test]
    fn split_fields_accepts_a_pre_stripped_body() {
        let fields = split_fields("a,b,c", 3).unwrap();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn bool_field_matches_upstream_semantics() {
        let fields = vec!["TRUE".to_string(), "1".to_string(), "false".to_string()];
        assert!(bool_field(&fields, 0));
        assert!(!bool_field(&fields, 1));
        assert!(!bool_field(&fields, 2));
    }

    #[test]
    fn decimal_field_parses_and_reports_garbage() {
        let fields = vec!["100.50".to_string(), "abc".to_string()];
        assert_eq!(decimal_field(&fields, 0).unwrap(), dec!(100.50));
        let err = decimal_field(&fields, 1).unwrap_err();
        assert!(matches!(err, MappingError::Field { index: 1, .. }));
    }

    #[test]
    fn i64_field_parses_and_reports_garbage() {
        let fields = vec!["42".to_string(), "4.2".to_string()];
        assert_eq!(i64_field(&fields, 0).unwrap(), 42);
        assert!(i64_field(&fields, 1).is_err());
    }
}
