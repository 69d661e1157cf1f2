//! Narrative — free-form multi-line text between `">` and `<"`

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A block of prose kept exactly as written, including its line breaks
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Narrative(String);

impl Narrative {
    /// Wrap a body; it must begin with a line break and may not contain `<"`
    pub fn new(body: &str) -> Result<Narrative> {
        format!("\">{}<\"", body).parse()
    }

    pub fn body(&self) -> &str {
        &self.0
    }

    /// The lines of prose between the delimiters
    pub fn lines(&self) -> Vec<&str> {
        let body = self.0.trim_start_matches(['\r', '\n']);
        let body = body.trim_end_matches([' ', '\t']);
        let mut lines: Vec<&str> = body.lines().collect();
        if lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
            lines.pop();
        }
        lines
    }
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\">{}<\"", self.0)
    }
}

impl FromStr for Narrative {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let body = text
            .strip_prefix("\">")
            .and_then(|rest| rest.strip_suffix("<\""))
            .ok_or_else(|| Error::value("narrative", text, "must be enclosed in '\">' and '<\"'"))?;
        if !body.starts_with('\n') && !body.starts_with("\r\n") {
            return Err(Error::value("narrative", text, "must begin on a new line"));
        }
        if body.contains("<\"") {
            return Err(Error::value("narrative", text, "contains the closing delimiter"));
        }
        Ok(Narrative(body.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_is_verbatim() {
        let text = "\">\n    This is a story.\n      Indented.\n<\"";
        let narrative: Narrative = text.parse().unwrap();
        assert_eq!(narrative.body(), "\n    This is a story.\n      Indented.\n");
        assert_eq!(narrative.to_string(), text);
        assert_eq!(narrative.lines(), vec!["    This is a story.", "      Indented."]);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("\">same line<\"".parse::<Narrative>().is_err());
        assert!("\"plain\"".parse::<Narrative>().is_err());
        assert!(Narrative::new("\na <\" b\n").is_err());
        assert!(Narrative::new("\nfine\n").is_ok());
    }
}
