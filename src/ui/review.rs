//! Review summary rendering

use crate::app::App;
use crate::wizard::{submission_reason, EntityType, FieldValue, FormRecord, StageData, StageId};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const NOT_PROVIDED: &str = "Not provided";

/// A line of the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryRow {
    Heading(&'static str),
    Field(&'static str, String),
}

/// One titled block of the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub title: String,
    pub rows: Vec<SummaryRow>,
}

/// Show only the last four digits of an SSN
fn mask_ssn(ssn: &str) -> String {
    let digits: Vec<char> = ssn.chars().filter(char::is_ascii_digit).collect();
    let last_four: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("***-**-{last_four}")
}

fn value(data: Option<&StageData>, name: &str) -> String {
    data.and_then(|d| d.get(name))
        .map(FieldValue::to_input)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Join the non-empty parts with spaces
fn join(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

fn address_rows(data: Option<&StageData>, prefix: &str) -> Vec<SummaryRow> {
    let get = |suffix: &str| value(data, &format!("{prefix}_{suffix}"));
    let line2 = get("address_line2");
    let street = if line2.is_empty() {
        get("address_line1")
    } else {
        format!("{}, {}", get("address_line1"), line2)
    };
    let city_line = format!("{}, {} {}", get("city"), get("state"), get("zip"));
    vec![
        SummaryRow::Field("Address", street),
        SummaryRow::Field(
            "City, State ZIP",
            if city_line.trim() == "," { String::new() } else { city_line },
        ),
        SummaryRow::Field("Phone", get("phone")),
    ]
}

/// Build the review summary from the accepted stages
pub fn summary_sections(record: &FormRecord) -> Vec<SummarySection> {
    let section = |stage: StageId, rows: Vec<(&'static str, String)>| SummarySection {
        title: format!("{}. {}", stage.index() + 1, stage.title()),
        rows: rows
            .into_iter()
            .map(|(label, text)| SummaryRow::Field(label, text))
            .collect(),
    };

    let basic = record.stage(StageId::BasicInformation);
    let reason = submission_reason(record);
    let entity = EntityType::from_record(record);
    let mut basic_rows = vec![
        (
            "Submission Reason",
            reason.map(|r| r.description().to_string()).unwrap_or_default(),
        ),
        (
            "Entity Type",
            entity.map(|e| e.description().to_string()).unwrap_or_default(),
        ),
    ];
    let npi = value(basic, "npi");
    if !npi.is_empty() || reason.is_some_and(|r| r.refers_to_existing_npi()) {
        basic_rows.push(("Existing NPI", npi));
    }

    let ident = record.stage(StageId::IdentifyingInformation);
    let get = |name: &str| value(ident, name);
    let mut ident_rows = match entity {
        Some(EntityType::Organization) => vec![
            ("Organization Name", get("organization_name")),
            ("Organization Type", get("organization_type")),
            ("EIN", get("ein")),
        ],
        _ => {
            let ssn = get("ssn");
            vec![
                (
                    "Full Name",
                    join(&[
                        get("name_prefix"),
                        get("first_name"),
                        get("middle_name"),
                        get("last_name"),
                        get("name_suffix"),
                    ]),
                ),
                ("Credential", get("credential")),
                ("Date of Birth", get("date_of_birth")),
                ("Gender", get("gender")),
                ("SSN", if ssn.is_empty() { ssn } else { mask_ssn(&ssn) }),
            ]
        }
    };
    ident_rows.push(("State License Number", get("state_license_number")));
    ident_rows.push(("Issuing State", get("issuing_state")));

    let address = record.stage(StageId::BusinessAddress);
    let mut address_section = section(StageId::BusinessAddress, Vec::new());
    address_section.rows.push(SummaryRow::Heading("Mailing Address"));
    address_section.rows.extend(address_rows(address, "mailing"));
    address_section.rows.push(SummaryRow::Heading("Practice Location"));
    address_section.rows.extend(address_rows(address, "practice"));

    let contact = record.stage(StageId::ContactPerson);
    let ext = value(contact, "contact_phone_ext");
    let phone = if ext.is_empty() {
        value(contact, "contact_phone")
    } else {
        format!("{} ext. {}", value(contact, "contact_phone"), ext)
    };
    let contact_rows = vec![
        (
            "Name",
            join(&[
                value(contact, "contact_first_name"),
                value(contact, "contact_middle_name"),
                value(contact, "contact_last_name"),
            ]),
        ),
        ("Phone", phone),
        ("Email", value(contact, "contact_email")),
    ];

    let cert = record.stage(StageId::Certification);
    let cert_rows = vec![
        (
            "Authorized Official",
            join(&[
                value(cert, "authorized_official_first_name"),
                value(cert, "authorized_official_middle_name"),
                value(cert, "authorized_official_last_name"),
            ]),
        ),
        ("Title", value(cert, "authorized_official_title")),
        ("Phone", value(cert, "authorized_official_phone")),
        ("Email", value(cert, "authorized_official_email")),
        ("Signature", value(cert, "signature")),
        ("Date", value(cert, "certification_date")),
    ];

    vec![
        section(StageId::BasicInformation, basic_rows),
        section(StageId::IdentifyingInformation, ident_rows),
        address_section,
        section(StageId::ContactPerson, contact_rows),
        section(StageId::Certification, cert_rows),
    ]
}

/// Number of lines the review summary renders
pub fn summary_line_count(record: &FormRecord) -> usize {
    summary_sections(record)
        .iter()
        .map(|section| section.rows.len() + 2)
        .sum()
}

/// Draw the review screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let failure = app.state.wizard.failure_message();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(if failure.is_some() { 4 } else { 3 }),
        ])
        .split(area);

    let mut lines = Vec::new();
    for section in summary_sections(app.state.wizard.record()) {
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for row in section.rows {
            let (label, text) = match row {
                SummaryRow::Heading(heading) => {
                    lines.push(Line::from(Span::styled(
                        format!("  {heading}"),
                        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                    )));
                    continue;
                }
                SummaryRow::Field(label, text) => (label, text),
            };
            let shown = if text.is_empty() {
                Span::styled(NOT_PROVIDED, Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(text)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {label:<22}"), Style::default().fg(Color::Gray)),
                shown,
            ]));
        }
        lines.push(Line::from(""));
    }

    let summary = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Review Your Application ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .scroll((u16::try_from(app.state.review_scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(summary, chunks[0]);

    let mut notice = vec![Line::from(Span::styled(
        "By submitting this application, you certify that all information provided is true and accurate.",
        Style::default().fg(Color::Yellow),
    ))];
    if let Some(message) = failure {
        notice.push(Line::from(Span::styled(
            format!("Last attempt failed: {message}"),
            Style::default().fg(Color::Red),
        )));
    }
    let notice = Paragraph::new(notice)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    frame.render_widget(notice, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::controller::tests::wizard_at_review;
    use pretty_assertions::assert_eq;

    fn row<'a>(sections: &'a [SummarySection], label: &str) -> Option<&'a str> {
        sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .find_map(|r| match r {
                SummaryRow::Field(l, v) if *l == label => Some(v.as_str()),
                _ => None,
            })
    }

    #[test]
    fn test_mask_ssn() {
        assert_eq!(mask_ssn("123-45-6789"), "***-**-6789");
        assert_eq!(mask_ssn("12"), "***-**-12");
    }

    #[test]
    fn test_individual_summary() {
        let wizard = wizard_at_review();
        let sections = summary_sections(wizard.record());
        assert_eq!(sections.len(), StageId::COUNT);
        assert_eq!(sections[0].title, "1. Basic Information");
        assert_eq!(
            row(&sections, "Submission Reason"),
            Some("Initial Application (New NPI)")
        );
        assert_eq!(
            row(&sections, "Entity Type"),
            Some("Individual (Physician, Dentist, etc.)")
        );
        assert_eq!(row(&sections, "Full Name"), Some("Jane Doe"));
        assert_eq!(row(&sections, "SSN"), Some("***-**-6789"));
        assert_eq!(row(&sections, "Date of Birth"), Some("1980-01-01"));
        assert_eq!(row(&sections, "Existing NPI"), None);
        assert_eq!(row(&sections, "EIN"), None);
        assert_eq!(
            row(&sections, "City, State ZIP"),
            Some("New York, NY 10001-0001")
        );
        assert_eq!(row(&sections, "Date"), Some("2024-05-01"));
    }

    #[test]
    fn test_line_count_covers_titles_and_spacers() {
        let sections = summary_sections(&FormRecord::new());
        let rows: usize = sections.iter().map(|s| s.rows.len()).sum();
        assert_eq!(
            summary_line_count(&FormRecord::new()),
            rows + 2 * StageId::COUNT
        );
    }

    #[test]
    fn test_empty_record_has_blank_rows() {
        let sections = summary_sections(&FormRecord::new());
        assert_eq!(row(&sections, "Submission Reason"), Some(""));
        assert_eq!(row(&sections, "SSN"), Some(""));
        assert_eq!(row(&sections, "City, State ZIP"), Some(""));
        assert_eq!(
            sections[2].rows[0],
            SummaryRow::Heading("Mailing Address")
        );
    }
}
