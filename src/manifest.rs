//! Archive manifest parsing.
//!
//! The manifest is a reserved text entry (`META-INF/MANIFEST.MF`) of
//! `Key: value` lines. Writers fold long values across physical lines; a
//! continuation line starts with a single space and is joined to the previous
//! line before the key/value split. The main attribute block ends at the
//! first blank line; any per-entry sections after it are ignored here.

use anyhow::{Result, bail};

/// Name of the reserved manifest entry within an archive.
pub const MANIFEST_NAME: &str = "META-INF/MANIFEST.MF";

/// Parsed manifest attributes.
///
/// Attribute order is preserved as stored. Lookup is by exact key; values
/// keep the exact casing of the stored text.
#[derive(Debug, Clone)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    /// Parse manifest text.
    ///
    /// # Errors
    ///
    /// Fails on a continuation line with nothing to continue, a non-blank
    /// line without a `:` separator, or an empty attribute name.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)?;

        // Unfold physical lines into logical lines first. A line starting
        // with a single space continues the previous logical line.
        let mut logical: Vec<String> = Vec::new();
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                // Blank line ends the main attribute block.
                break;
            }
            if let Some(rest) = line.strip_prefix(' ') {
                match logical.last_mut() {
                    Some(prev) => prev.push_str(rest),
                    None => bail!("continuation line with no preceding attribute"),
                }
            } else {
                logical.push(line.to_string());
            }
        }

        let mut attributes = Vec::with_capacity(logical.len());
        for line in logical {
            let Some(colon) = line.find(':') else {
                bail!("attribute line without ':' separator: {line:?}");
            };
            let name = &line[..colon];
            if name.is_empty() {
                bail!("attribute line with empty name: {line:?}");
            }
            let value = line[colon + 1..].strip_prefix(' ').unwrap_or(&line[colon + 1..]);
            attributes.push((name.to_string(), value.to_string()));
        }

        Ok(Self { attributes })
    }

    /// Look up an attribute value by exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over attributes in stored order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_attributes() {
        let manifest = Manifest::parse(b"Manifest-Version: 1.0\nEntrypointName: com.example.Main\n")
            .unwrap();
        assert_eq!(manifest.get("Manifest-Version"), Some("1.0"));
        assert_eq!(manifest.get("EntrypointName"), Some("com.example.Main"));
        assert_eq!(manifest.get("Missing"), None);
    }

    #[test]
    fn folds_continuation_lines_before_split() {
        // A value split across a continuation line must read back joined.
        let text = b"EntrypointName: com.example.applications.with.a.very.long.pack\n age.Main\n";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(
            manifest.get("EntrypointName"),
            Some("com.example.applications.with.a.very.long.package.Main")
        );
    }

    #[test]
    fn handles_crlf_line_endings() {
        let manifest = Manifest::parse(b"Key: value\r\nOther: x\r\n").unwrap();
        assert_eq!(manifest.get("Key"), Some("value"));
        assert_eq!(manifest.get("Other"), Some("x"));
    }

    #[test]
    fn blank_line_terminates_main_block() {
        let manifest = Manifest::parse(b"Key: value\n\nName: entry.class\nIgnored: yes\n").unwrap();
        assert_eq!(manifest.get("Key"), Some("value"));
        assert_eq!(manifest.get("Ignored"), None);
    }

    #[test]
    fn value_casing_is_preserved() {
        let manifest = Manifest::parse(b"Key: MixedCase.Value\n").unwrap();
        assert_eq!(manifest.get("Key"), Some("MixedCase.Value"));
        // Lookup is case-sensitive by key as stored.
        assert_eq!(manifest.get("key"), None);
    }

    #[test]
    fn rejects_line_without_separator() {
        assert!(Manifest::parse(b"NoSeparatorHere\n").is_err());
    }

    #[test]
    fn rejects_leading_continuation() {
        assert!(Manifest::parse(b" dangling\n").is_err());
    }
}
