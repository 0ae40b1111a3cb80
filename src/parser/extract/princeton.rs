use super::{Coerce, Field};

// Every container is its own block, named after its label.
pub const FIELDS: &[Field] = &[
    Field {
        block: "Applicants",
        label: "Applicants",
        coerce: Coerce::Int(|r| &mut r.num_applicants),
    },
    Field {
        block: "Acceptance Rate",
        label: "Acceptance Rate",
        coerce: Coerce::Float(|r| &mut r.acceptance_rate),
    },
    Field {
        block: "Average HS GPA",
        label: "Average HS GPA",
        coerce: Coerce::Float(|r| &mut r.gpa_average),
    },
    Field {
        block: "ACT Composite",
        label: "ACT Composite",
        coerce: Coerce::Range {
            low: |r| &mut r.act_range_low,
            high: |r| &mut r.act_range_high,
        },
    },
];
