pub mod big_future;
pub mod princeton;

use std::collections::HashMap;

use scraper::Html;
use tracing::debug;

use super::blocks::InfoBlock;
use super::layout::BlockLayout;
use crate::coerce;
use crate::error::FieldError;
use crate::merge::fill;
use crate::record::{CollegeRecord, Deadline, Ownership};

/// Accessor for one optional field of the record.
pub type Slot<T> = fn(&mut CollegeRecord) -> &mut Option<T>;

/// How a property's value is read and where it lands.
pub enum Coerce {
    Int(Slot<i64>),
    Float(Slot<f64>),
    Deadline(Slot<Deadline>),
    /// "low - high", written to two fields.
    Range { low: Slot<i64>, high: Slot<i64> },
    /// Positional plain-text descriptor, accepted only as Public/Private.
    Ownership { line: usize },
}

/// One row of a site's field table.
pub struct Field {
    pub block: &'static str,
    pub label: &'static str,
    pub coerce: Coerce,
}

/// The property that broke extraction, with what was wrong with it.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedField {
    pub block: &'static str,
    pub label: &'static str,
    pub error: FieldError,
}

/// Run a field table against a parsed page, filling only unset fields.
/// Returns how many fields were written.
pub fn apply_fields(
    doc: &Html,
    layout: &dyn BlockLayout,
    fields: &[Field],
    record: &mut CollegeRecord,
) -> Result<usize, MalformedField> {
    let mut blocks: HashMap<&str, Option<InfoBlock>> = HashMap::new();
    let mut filled = 0;

    for field in fields {
        let block = blocks
            .entry(field.block)
            .or_insert_with(|| layout.block(doc, field.block));
        let Some(block) = block else {
            continue;
        };

        let wrote = apply_one(block, field, record).map_err(|error| MalformedField {
            block: field.block,
            label: field.label,
            error,
        })?;
        if wrote > 0 {
            debug!(block = field.block, label = field.label, "filled");
        }
        filled += wrote;
    }

    Ok(filled)
}

fn apply_one(
    block: &InfoBlock,
    field: &Field,
    record: &mut CollegeRecord,
) -> Result<usize, FieldError> {
    if let Coerce::Ownership { line } = field.coerce {
        let ownership = block.descriptor(line).and_then(Ownership::from_descriptor);
        return Ok(fill(&mut record.ownership, ownership) as usize);
    }

    let Some(raw) = block.property(field.label)? else {
        return Ok(0);
    };

    let wrote = match field.coerce {
        Coerce::Int(slot) => fill(slot(record), Some(coerce::int(raw)?)) as usize,
        Coerce::Float(slot) => fill(slot(record), Some(coerce::float(raw)?)) as usize,
        Coerce::Deadline(slot) => {
            let deadline = coerce::deadline(raw)?;
            if let Some(d) = deadline {
                debug!(label = field.label, deadline = %d, "parsed deadline");
            }
            fill(slot(record), deadline) as usize
        }
        Coerce::Range { low, high } => {
            let (lo, hi) = coerce::range(raw)?;
            fill(low(record), Some(lo)) as usize + fill(high(record), Some(hi)) as usize
        }
        Coerce::Ownership { .. } => 0,
    };
    Ok(wrote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::layout::HeadingBlocks;

    const TABLE: &[Field] = &[
        Field {
            block: "Quick Facts",
            label: "Total undergraduates",
            coerce: Coerce::Int(|r| &mut r.num_undergrads),
        },
        Field {
            block: "Quick Facts",
            label: "In-State Tuition",
            coerce: Coerce::Float(|r| &mut r.in_state_tuition),
        },
        Field {
            block: "Admission",
            label: "Regular application due",
            coerce: Coerce::Deadline(|r| &mut r.standard_deadline),
        },
    ];

    fn page(body: &str) -> Html {
        Html::parse_document(&format!("<table><tr>{body}</tr></table>"))
    }

    #[test]
    fn fills_every_present_field() {
        let doc = page(
            "<td><h2>Quick Facts</h2><p>Total undergraduates: 7,083</p>\
             <p>In-State Tuition: $10,560</p></td>\
             <td><h2>Admission</h2><p>Regular application due: Jan 15</p></td>",
        );
        let mut record = CollegeRecord::default();
        assert_eq!(apply_fields(&doc, &HeadingBlocks, TABLE, &mut record), Ok(3));
        assert_eq!(record.num_undergrads, Some(7083));
        assert_eq!(record.in_state_tuition, Some(10560.0));
        assert_eq!(record.standard_deadline, Deadline::new(1, 15));
    }

    #[test]
    fn missing_block_and_sentinel_are_skipped() {
        let doc = page("<td><h2>Admission</h2><p>Regular application due: No regular application</p></td>");
        let mut record = CollegeRecord::default();
        assert_eq!(apply_fields(&doc, &HeadingBlocks, TABLE, &mut record), Ok(0));
        assert_eq!(record, CollegeRecord::default());
    }

    #[test]
    fn bad_number_names_the_label() {
        let doc = page("<td><h2>Quick Facts</h2><p>Total undergraduates: lots</p></td>");
        let mut record = CollegeRecord::default();
        let err = apply_fields(&doc, &HeadingBlocks, TABLE, &mut record).unwrap_err();
        assert_eq!(err.block, "Quick Facts");
        assert_eq!(err.label, "Total undergraduates");
        assert_eq!(err.error, FieldError::NotANumber { raw: "lots".into() });
    }

    #[test]
    fn preset_fields_are_kept() {
        let doc = page("<td><h2>Quick Facts</h2><p>Total undergraduates: 7,083</p></td>");
        let mut record = CollegeRecord {
            num_undergrads: Some(100),
            ..Default::default()
        };
        assert_eq!(apply_fields(&doc, &HeadingBlocks, TABLE, &mut record), Ok(0));
        assert_eq!(record.num_undergrads, Some(100));
    }
}
