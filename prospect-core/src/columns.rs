// Column layout for the prospect sheet

use prospect_enricher::CompanyProfile;
use prospect_enricher::profile::PROFILE_FIELDS;

/// Maps sheet columns to profile fields.
///
/// The column layout is a positional contract with the sheet's external
/// schema: two input columns (company name, domain) and one output column
/// per entry in `output_fields`. `output_end` must sit exactly
/// `output_fields.len() - 1` columns after `output_start`.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    /// Optional tab name, prefixed to every A1 range as `{sheet}!`.
    pub sheet: Option<String>,
    pub input_start: char,
    pub input_end: char,
    pub output_start: char,
    pub output_end: char,
    pub output_fields: Vec<&'static str>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            sheet: None,
            input_start: 'A',
            input_end: 'B',
            output_start: 'C',
            output_end: 'G',
            output_fields: PROFILE_FIELDS.to_vec(),
        }
    }
}

impl ColumnMap {
    fn prefix(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{}!", sheet),
            None => String::new(),
        }
    }

    /// A1 range covering the input span for a 1-indexed inclusive row range.
    pub fn input_range(&self, start_row: u32, end_row: u32) -> String {
        format!(
            "{}{}{}:{}{}",
            self.prefix(),
            self.input_start,
            start_row,
            self.input_end,
            end_row
        )
    }

    /// A1 range covering the output span of a single row.
    pub fn output_range(&self, row: u32) -> String {
        format!(
            "{}{}{}:{}{}",
            self.prefix(),
            self.output_start,
            row,
            self.output_end,
            row
        )
    }

    /// Render a profile as one output row, in column order.
    ///
    /// Missing fields become empty cells.
    pub fn profile_row(&self, profile: &CompanyProfile) -> Vec<String> {
        self.output_fields
            .iter()
            .map(|field| profile.field(field))
            .collect()
    }
}
