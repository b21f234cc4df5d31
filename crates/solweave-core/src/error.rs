use indexmap::IndexMap;
use thiserror::Error;

/// Field-scoped validation error for user-supplied options.
///
/// Each entry maps an option field name to a human-readable message, so a
/// caller can surface the message next to the offending input. Builder misuse
/// (double finalization, malformed natspec keys) is not represented here; those
/// are programming errors and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_messages(.messages))]
pub struct OptionsError {
    pub messages: IndexMap<String, String>,
}

impl OptionsError {
    pub fn new<K, V, I>(messages: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            messages: messages
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([(field.into(), message.into())])
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }
}

fn format_messages(messages: &IndexMap<String, String>) -> String {
    messages
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}
