use crate::error::OptionsError;

/// Converts arbitrary user input into a valid Solidity identifier.
///
/// Leading characters that cannot start an identifier are dropped, runs of
/// non-identifier characters are collapsed and the following character is
/// uppercased, so `"my token"` becomes `"MyToken"` when capitalized.
pub fn to_identifier(input: &str, capitalize: bool) -> Result<String, OptionsError> {
    let mut result = String::with_capacity(input.len());
    let mut upper_next = false;

    for c in input.chars() {
        if result.is_empty() {
            if c.is_ascii_alphabetic() || c == '_' {
                result.push(if capitalize { c.to_ascii_uppercase() } else { c });
            }
            continue;
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            if upper_next {
                result.push(c.to_ascii_uppercase());
                upper_next = false;
            } else {
                result.push(c);
            }
        } else {
            upper_next = true;
        }
    }

    if result.is_empty() {
        Err(OptionsError::single(
            "name",
            "Identifier is empty or does not have valid characters",
        ))
    } else {
        Ok(result)
    }
}

/// Renders a string literal, switching to Solidity's `unicode""` form when the
/// content is not plain ASCII. Backslashes and double quotes are escaped.
pub fn stringify_unicode_safe(input: &str) -> String {
    let escaped = input.replace('\\', "\\\\").replace('"', "\\\"");
    if input.is_ascii() {
        format!("\"{escaped}\"")
    } else {
        format!("unicode\"{escaped}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("MyToken", true).unwrap(), "MyToken");
        assert_eq!(to_identifier("my token", true).unwrap(), "MyToken");
        assert_eq!(to_identifier("my token", false).unwrap(), "myToken");
        assert_eq!(to_identifier("my-token 2", true).unwrap(), "MyToken2");
        assert_eq!(to_identifier("123abc", true).unwrap(), "Abc");
        assert_eq!(to_identifier("_private", false).unwrap(), "_private");
    }

    #[test]
    fn test_to_identifier_empty() {
        let err = to_identifier("123", true).unwrap_err();
        assert_eq!(
            err.message("name"),
            Some("Identifier is empty or does not have valid characters")
        );
    }

    #[test]
    fn test_stringify_unicode_safe() {
        assert_eq!(stringify_unicode_safe("My Token"), "\"My Token\"");
        assert_eq!(stringify_unicode_safe(""), "\"\"");
        assert_eq!(stringify_unicode_safe("MyTok\"e\"n"), "\"MyTok\\\"e\\\"n\"");
        assert_eq!(stringify_unicode_safe("ć"), "unicode\"ć\"");
        assert_eq!(stringify_unicode_safe("MyTokeć"), "unicode\"MyTokeć\"");
        assert_eq!(
            stringify_unicode_safe("MyToke\"ć\""),
            "unicode\"MyToke\\\"ć\\\"\""
        );
    }
}
