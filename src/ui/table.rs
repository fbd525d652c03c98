use tabled::{settings::Style, Table, Tabled};

use crate::catalog::CourseListItem;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct CourseRow<'a> {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Course")]
    name: &'a str,
    #[tabled(rename = "Credits")]
    credits: &'a str,
    #[tabled(rename = "Grade")]
    grade: &'a str,
}

/// Bound list items as a table; empty string for an empty list
pub fn course_table(items: &[CourseListItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let rows: Vec<CourseRow> = items
        .iter()
        .map(|item| CourseRow {
            id: item.id,
            name: &item.name,
            credits: &item.credits,
            grade: &item.grade,
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
