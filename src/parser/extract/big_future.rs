use super::{Coerce, Field};

const fn float(block: &'static str, label: &'static str, slot: super::Slot<f64>) -> Field {
    Field {
        block,
        label,
        coerce: Coerce::Float(slot),
    }
}

const fn deadline(
    block: &'static str,
    label: &'static str,
    slot: super::Slot<crate::record::Deadline>,
) -> Field {
    Field {
        block,
        label,
        coerce: Coerce::Deadline(slot),
    }
}

pub const FIELDS: &[Field] = &[
    // Quick facts
    Field {
        block: "Quick Facts",
        label: "Total undergraduates",
        coerce: Coerce::Int(|r| &mut r.num_undergrads),
    },
    float("Quick Facts", "In-State Tuition", |r| &mut r.in_state_tuition),
    float("Quick Facts", "Out-of-State Tuition", |r| &mut r.out_of_state_tuition),
    // School type: code plus "Public"/"Private" as the second descriptor
    Field {
        block: "Type of School",
        label: "College Board Code",
        coerce: Coerce::Int(|r| &mut r.sat_code),
    },
    Field {
        block: "Type of School",
        label: "ownership",
        coerce: Coerce::Ownership { line: 1 },
    },
    // Deadlines
    deadline("Admission", "Regular application due", |r| &mut r.standard_deadline),
    deadline(
        "Admission",
        "College will notify student of admission",
        |r| &mut r.standard_notification,
    ),
    deadline(
        "Early Decision and Action",
        "Early action application due",
        |r| &mut r.early_deadline,
    ),
    deadline(
        "Early Decision and Action",
        "College will notify student of early action admission by",
        |r| &mut r.early_notification,
    ),
    // ACT brackets
    float("ACT Composite", "30 - 36", |r| &mut r.act_composite_30_36),
    float("ACT Composite", "24 - 29", |r| &mut r.act_composite_24_29),
    float("ACT Composite", "18 - 23", |r| &mut r.act_composite_18_23),
    float("ACT Composite", "12 - 17", |r| &mut r.act_composite_12_17),
    float("ACT Math", "30 - 36", |r| &mut r.act_math_30_36),
    float("ACT Math", "24 - 29", |r| &mut r.act_math_24_29),
    float("ACT Math", "18 - 23", |r| &mut r.act_math_18_23),
    float("ACT Math", "12 - 17", |r| &mut r.act_math_12_17),
    float("ACT English", "30 - 36", |r| &mut r.act_english_30_36),
    float("ACT English", "24 - 29", |r| &mut r.act_english_24_29),
    float("ACT English", "18 - 23", |r| &mut r.act_english_18_23),
    float("ACT English", "12 - 17", |r| &mut r.act_english_12_17),
    // GPA brackets
    float("GPAs of incoming freshmen", "3.75+", |r| &mut r.gpa_375_plus),
    float("GPAs of incoming freshmen", "3.5 - 3.74", |r| &mut r.gpa_350_374),
    float("GPAs of incoming freshmen", "3.25 - 3.49", |r| &mut r.gpa_325_349),
    float("GPAs of incoming freshmen", "3.00 - 3.24", |r| &mut r.gpa_300_324),
    float("GPAs of incoming freshmen", "2.50 - 2.99", |r| &mut r.gpa_250_299),
];
