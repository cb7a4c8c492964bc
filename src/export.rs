/// Calendar and contact exports
///
/// Appointments become single-event iCalendar documents, clients become
/// vCard 3.0 entries. Both use CRLF line endings and escape embedded line
/// breaks as the two characters `\n`. Phone numbers and emails pass through
/// verbatim.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::state::data::{Appointment, Client};

const CRLF: &str = "\r\n";
const PRODUCT_ID: &str = "-//Tattoo Studio//EN";
const UID_DOMAIN: &str = "tattoo-studio";

/// iCalendar UTC timestamp (`20240305T140000Z`)
fn ics_timestamp(instant: NaiveDateTime) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Replace line breaks (`\r\n`, `\n` or a lone `\r`) with the literal `\n`
fn escape_newlines(value: &str) -> String {
    value
        .replace("\r\n", "\\n")
        .replace(['\n', '\r'], "\\n")
}

/// Single-event calendar document for `appointment`.
///
/// The stored date and times are read as UTC. `stamp` fills DTSTAMP. An
/// appointment that does not end after it starts is rejected.
pub fn calendar_event(appointment: &Appointment, stamp: DateTime<Utc>) -> Result<String, ExportError> {
    let start = appointment.date.and_time(appointment.start_time);
    let end = appointment.date.and_time(appointment.end_time);
    if end <= start {
        return Err(ExportError::EmptyTimeRange {
            start: appointment.start_time.format("%H:%M").to_string(),
            end: appointment.end_time.format("%H:%M").to_string(),
        });
    }

    let phone = (!appointment.client_phone.is_empty())
        .then(|| format!("Phone: {}", appointment.client_phone));
    let description = [Some(appointment.notes.clone()), phone]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODUCT_ID}"),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@{UID_DOMAIN}", appointment.id),
        format!("DTSTAMP:{}", ics_timestamp(stamp.naive_utc())),
        format!("DTSTART:{}", ics_timestamp(start)),
        format!("DTEND:{}", ics_timestamp(end)),
        format!("SUMMARY:Tattoo - {}", escape_newlines(&appointment.client_name)),
        format!("DESCRIPTION:{}", escape_newlines(&description)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    Ok(lines.join(CRLF))
}

/// vCard 3.0 entry for `client`
pub fn contact_card(client: &Client) -> String {
    let name = escape_newlines(&client.name);
    let lines = [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{name};;;"),
        format!("FN:{name}"),
        format!("TEL;TYPE=CELL:{}", escape_newlines(&client.phone)),
        format!("EMAIL:{}", escape_newlines(&client.email)),
        format!("NOTE:{}", escape_newlines(&client.notes)),
        "END:VCARD".to_string(),
    ];

    lines.join(CRLF)
}

/// A document ready to be saved or handed to another application
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

impl ExportFile {
    /// Write the content to `path`
    pub fn save(&self, path: &Path) -> Result<PathBuf, ExportError> {
        fs::write(path, &self.content).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("📤 Exported {} to {}", self.filename, path.display());
        Ok(path.to_path_buf())
    }
}

/// `<client>.ics` for an appointment
pub fn calendar_file(appointment: &Appointment, stamp: DateTime<Utc>) -> Result<ExportFile, ExportError> {
    Ok(ExportFile {
        filename: format!("{}.ics", appointment.client_name),
        mime: "text/calendar",
        content: calendar_event(appointment, stamp)?,
    })
}

/// `<client>.vcf` for a client
pub fn contact_file(client: &Client) -> ExportFile {
    ExportFile {
        filename: format!("{}.vcf", client.name),
        mime: "text/vcard",
        content: contact_card(client),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn appointment(notes: &str, phone: &str) -> Appointment {
        Appointment {
            id: "apt-1".to_string(),
            client_name: "Luna Vega".to_string(),
            client_phone: phone.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            notes: notes.to_string(),
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_calendar_event_times() {
        let ics = calendar_event(&appointment("", ""), stamp()).unwrap();
        let lines: Vec<&str> = ics.split("\r\n").collect();

        assert!(lines.contains(&"DTSTART:20240305T140000Z"));
        assert!(lines.contains(&"DTEND:20240305T150000Z"));
        assert!(lines.contains(&"DTSTAMP:20240301T093000Z"));
        assert!(lines.contains(&"UID:apt-1@tattoo-studio"));
        assert!(lines.contains(&"SUMMARY:Tattoo - Luna Vega"));
        assert!(lines.contains(&"DESCRIPTION:"));
        assert_eq!(lines.first(), Some(&"BEGIN:VCALENDAR"));
        assert_eq!(lines.last(), Some(&"END:VCALENDAR"));
    }

    #[test]
    fn test_calendar_description_joins_notes_and_phone() {
        let ics = calendar_event(&appointment("Forearm rose\nbring reference", "555-0199"), stamp()).unwrap();
        assert!(ics.contains("DESCRIPTION:Forearm rose\\nbring reference\\nPhone: 555-0199\r\n"));

        let phone_only = calendar_event(&appointment("", "555-0199"), stamp()).unwrap();
        assert!(phone_only.contains("DESCRIPTION:Phone: 555-0199\r\n"));
    }

    #[test]
    fn test_calendar_event_is_deterministic_for_fixed_stamp() {
        let apt = appointment("notes", "1");
        assert_eq!(
            calendar_event(&apt, stamp()).unwrap(),
            calendar_event(&apt, stamp()).unwrap()
        );
    }

    #[test]
    fn test_calendar_rejects_empty_range() {
        let mut apt = appointment("", "");
        apt.end_time = apt.start_time;
        assert!(matches!(
            calendar_event(&apt, stamp()),
            Err(ExportError::EmptyTimeRange { .. })
        ));

        apt.end_time = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        assert!(calendar_file(&apt, stamp()).is_err());
    }

    #[test]
    fn test_contact_card_escapes_note() {
        let client = Client {
            id: "c1".to_string(),
            name: "Luna Vega".to_string(),
            phone: "not a phone".to_string(),
            email: "luna@".to_string(),
            notes: "Sensitive skin\nPrefers black ink".to_string(),
        };

        let vcf = contact_card(&client);
        let expected = [
            "BEGIN:VCARD",
            "VERSION:3.0",
            "N:Luna Vega;;;",
            "FN:Luna Vega",
            "TEL;TYPE=CELL:not a phone",
            "EMAIL:luna@",
            "NOTE:Sensitive skin\\nPrefers black ink",
            "END:VCARD",
        ]
        .join("\r\n");
        assert_eq!(vcf, expected);
        assert!(!vcf.contains("skin\nPrefers"));

        let file = contact_file(&client);
        assert_eq!(file.filename, "Luna Vega.vcf");
        assert_eq!(file.mime, "text/vcard");
    }

    #[test]
    fn test_every_line_break_style_is_escaped() {
        assert_eq!(escape_newlines("a\r\nb\nc\rd"), "a\\nb\\nc\\nd");

        let client = Client {
            id: "c2".to_string(),
            name: "Old\rMac".to_string(),
            phone: String::new(),
            email: String::new(),
            notes: "line one\rline two".to_string(),
        };
        let vcf = contact_card(&client);
        assert!(vcf.contains("FN:Old\\nMac\r\n"));
        assert!(vcf.contains("NOTE:line one\\nline two\r\n"));
        // Only the CRLF separators may carry a carriage return
        assert_eq!(vcf.matches('\r').count(), vcf.matches("\r\n").count());

        let apt = Appointment {
            notes: "bring\rreference".to_string(),
            ..appointment("", "")
        };
        let ics = calendar_event(&apt, stamp()).unwrap();
        assert!(ics.contains("DESCRIPTION:bring\\nreference\r\n"));
        assert_eq!(ics.matches('\r').count(), ics.matches("\r\n").count());
    }

    #[test]
    fn test_save_writes_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = calendar_file(&appointment("", ""), stamp()).unwrap();
        assert_eq!(file.filename, "Luna Vega.ics");
        assert_eq!(file.mime, "text/calendar");

        let path = file.save(&dir.path().join(&file.filename)).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), file.content);
    }
}
