use chrono::NaiveDate;

/// Typed builder for the store's `filterByFormula` expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Eq { field: String, value: String },
    /// Case-insensitive substring search.
    Search { field: String, needle: String },
    RecordId(String),
    SameDay { field: String, date: NaiveDate },
    Blank(String),
    Truthy(String),
    And(Vec<Formula>),
    Or(Vec<Formula>),
}

impl Formula {
    pub fn eq(field: &str, value: impl Into<String>) -> Self {
        Formula::Eq {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn search(field: &str, needle: impl Into<String>) -> Self {
        Formula::Search {
            field: field.to_string(),
            needle: needle.into(),
        }
    }

    /// Same calendar day, or a blank field when `date` is `None`.
    pub fn on_date(field: &str, date: Option<NaiveDate>) -> Self {
        match date {
            Some(date) => Formula::SameDay {
                field: field.to_string(),
                date,
            },
            None => Formula::Blank(field.to_string()),
        }
    }

    pub fn any_record_id<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Formula::Or(ids.into_iter().map(|id| Formula::RecordId(id.into())).collect())
    }

    pub fn render(&self) -> String {
        match self {
            Formula::Eq { field, value } => format!("{} = {}", reference(field), quote(value)),
            Formula::Search { field, needle } => format!(
                "SEARCH(LOWER({}), LOWER({}))",
                quote(needle),
                reference(field)
            ),
            Formula::RecordId(id) => format!("RECORD_ID() = {}", quote(id)),
            Formula::SameDay { field, date } => format!(
                "IS_SAME({}, {}, 'day')",
                reference(field),
                quote(&date.format("%Y-%m-%d").to_string())
            ),
            Formula::Blank(field) => format!("{} = BLANK()", reference(field)),
            Formula::Truthy(field) => reference(field),
            Formula::And(parts) => combine("AND", "TRUE()", parts),
            Formula::Or(parts) => combine("OR", "FALSE()", parts),
        }
    }
}

fn combine(function: &str, empty: &str, parts: &[Formula]) -> String {
    match parts {
        [] => empty.to_string(),
        [single] => single.render(),
        parts => format!(
            "{function}({})",
            parts
                .iter()
                .map(Formula::render)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn reference(field: &str) -> String {
    format!("{{{field}}}")
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
