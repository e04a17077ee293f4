//! Structured message extraction from build stdout.
//!
//! The test adapter inside the build prints every line of a result with a
//! fixed prefix. Consecutive prefixed lines form one message; any other line
//! (Gradle progress, compiler warnings, ...) closes the current message and
//! is dropped.

use crate::models::constants::MESSAGE_PREFIX;

/// One result block emitted by the test adapter, prefix removed.
/// Every line, including the last, ends with `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredMessage(String);

impl StructuredMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for StructuredMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collect messages marked with the standard prefix
pub fn collect_messages<'a, I>(lines: I) -> Vec<StructuredMessage>
where
    I: IntoIterator<Item = &'a str>,
{
    collect_messages_with_prefix(lines, MESSAGE_PREFIX)
}

/// Collect messages marked with `prefix`, in emission order
pub fn collect_messages_with_prefix<'a, I>(lines: I, prefix: &str) -> Vec<StructuredMessage>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut messages = Vec::new();
    let mut current: Option<String> = None;

    for line in lines {
        match line.strip_prefix(prefix) {
            Some(content) => {
                let buffer = current.get_or_insert_with(String::new);
                buffer.push_str(content);
                buffer.push('\n');
            }
            None => {
                if let Some(message) = current.take() {
                    messages.push(StructuredMessage(message));
                }
            }
        }
    }

    if let Some(message) = current {
        messages.push(StructuredMessage(message));
    }

    messages
}
