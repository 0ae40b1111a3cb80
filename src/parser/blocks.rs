use crate::error::FieldError;

/// One descriptor line of an info block.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// `label: value`, both trimmed.
    Pair { label: String, value: String },
    /// No colon; carries no field but may be a positional descriptor.
    Text(String),
    /// More than one colon. The block no longer looks the way we expect.
    Malformed(String),
}

impl Line {
    pub fn parse(raw: &str) -> Line {
        let raw = raw.trim();
        let mut parts = raw.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(label), Some(value), None) => Line::Pair {
                label: label.trim().to_string(),
                value: value.trim().to_string(),
            },
            (_, None, _) => Line::Text(raw.to_string()),
            _ => Line::Malformed(raw.to_string()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Line::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// A named section of a page with its descriptor lines in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoBlock {
    pub name: String,
    pub lines: Vec<Line>,
}

impl InfoBlock {
    pub fn new(name: impl Into<String>, lines: Vec<Line>) -> Self {
        InfoBlock {
            name: name.into(),
            lines,
        }
    }

    pub fn from_raw<'a>(name: impl Into<String>, raw: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(name, raw.into_iter().map(Line::parse).collect())
    }

    /// Value of the first `label: value` line whose label matches, ignoring
    /// case and surrounding whitespace. A malformed line met before the match
    /// is an error.
    pub fn property(&self, label: &str) -> Result<Option<&str>, FieldError> {
        let wanted = label.trim().to_lowercase();
        for line in &self.lines {
            match line {
                Line::Malformed(raw) => {
                    return Err(FieldError::MultipleColons { line: raw.clone() });
                }
                Line::Pair { label, value } if label.to_lowercase() == wanted => {
                    return Ok(Some(value));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Text of the `index`-th line when it is a plain descriptor.
    pub fn descriptor(&self, index: usize) -> Option<&str> {
        self.lines.get(index).and_then(Line::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_colon() {
        assert_eq!(
            Line::parse("  Acceptance Rate: 62% "),
            Line::Pair {
                label: "Acceptance Rate".into(),
                value: "62%".into()
            }
        );
    }

    #[test]
    fn empty_value_is_still_a_pair() {
        assert_eq!(
            Line::parse("SAT Code:"),
            Line::Pair {
                label: "SAT Code".into(),
                value: String::new()
            }
        );
    }

    #[test]
    fn no_colon_is_text() {
        assert_eq!(Line::parse("Public"), Line::Text("Public".into()));
    }

    #[test]
    fn two_colons_are_malformed() {
        assert_eq!(
            Line::parse("Hours: 9:00 - 5:00"),
            Line::Malformed("Hours: 9:00 - 5:00".into())
        );
    }

    #[test]
    fn property_lookup_ignores_case_and_whitespace() {
        let block = InfoBlock::from_raw(
            "Quick Facts",
            ["4-year", "Total undergraduates: 7,083", "In-State Tuition: $10,560"],
        );
        assert_eq!(block.property("total UNDERGRADUATES "), Ok(Some("7,083")));
        assert_eq!(block.property("In-State Tuition"), Ok(Some("$10,560")));
        assert_eq!(block.property("Out-of-State Tuition"), Ok(None));
    }

    #[test]
    fn malformed_line_before_match_is_surfaced() {
        let block = InfoBlock::from_raw("Admission", ["Call: 555: 1234", "Regular application due: Jan 15"]);
        assert_eq!(
            block.property("Regular application due"),
            Err(FieldError::MultipleColons {
                line: "Call: 555: 1234".into()
            })
        );
    }

    #[test]
    fn positional_descriptors() {
        let block = InfoBlock::from_raw("Type of School", ["4-year", "Private", "College Board Code: 1234"]);
        assert_eq!(block.descriptor(1), Some("Private"));
        assert_eq!(block.descriptor(2), None);
        assert_eq!(block.descriptor(7), None);
    }
}
