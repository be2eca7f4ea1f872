//! CSV export of leads.
//!
//! Produces a flat file for the operator's call sheet. Column order and the
//! Dutch header names are fixed; downstream spreadsheets depend on them.

use chrono::Utc;

use crate::models::lead::Model as LeadModel;

const HEADER: &[&str] = &[
    "Bedrijfsnaam",
    "Eigenaar",
    "Telefoon",
    "Website",
    "Stad",
    "Adres",
    "Google Rating",
    "Reviews",
    "Diensten",
    "Specialisaties",
    "Medewerkers",
    "Pitch",
    "Bel Status",
    "Notities",
    "Status",
];

/// Render the given leads as a CSV document, header row included.
pub fn leads_to_csv(leads: &[LeadModel]) -> String {
    let mut out = String::new();
    write_record(&mut out, HEADER.iter().map(|h| h.to_string()));

    for lead in leads {
        write_record(
            &mut out,
            [
                lead.company_name.clone(),
                lead.owner_name.clone().unwrap_or_default(),
                lead.phone.clone().unwrap_or_default(),
                lead.website.clone().unwrap_or_default(),
                lead.city.clone(),
                lead.address.clone(),
                lead.google_rating.map(|r| r.to_string()).unwrap_or_default(),
                lead.review_count.map(|c| c.to_string()).unwrap_or_default(),
                lead.services.joined(),
                lead.specializations.joined(),
                lead.employee_estimate
                    .map(|e| e.to_string())
                    .unwrap_or_default(),
                lead.pitch.clone().unwrap_or_default(),
                lead.call_status.as_str().to_string(),
                lead.call_notes.clone().unwrap_or_default(),
                lead.status.as_str().to_string(),
            ]
            .into_iter(),
        );
    }

    out
}

/// Timestamped download filename, e.g. `leads_export_20260827_141503.csv`.
pub fn export_filename() -> String {
    format!("leads_export_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"))
}

fn write_record(out: &mut String, fields: impl Iterator<Item = String>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&quote(&field));
    }
    out.push_str("\r\n");
}

/// RFC 4180 quoting: wrap fields containing separators or quotes, doubling
/// embedded quotes.
fn quote(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        let mut quoted = String::with_capacity(field.len() + 2);
        quoted.push('"');
        for ch in field.chars() {
            if ch == '"' {
                quoted.push('"');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        quoted
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::{CallStatus, LeadStatus, StringList};
    use uuid::Uuid;

    fn lead() -> LeadModel {
        LeadModel {
            id: Uuid::new_v4(),
            source: "google_maps".to_string(),
            company_name: "GroenTotaal".to_string(),
            address: "Lange Laan 1".to_string(),
            city: "Rotterdam".to_string(),
            postal_code: "3011 AB".to_string(),
            phone: Some("+31 10 1234567".to_string()),
            website: Some("https://groentotaal.nl".to_string()),
            google_rating: Some(4.5),
            review_count: Some(12),
            owner_name: None,
            contact_person: None,
            description: None,
            services: StringList(vec!["tuinaanleg".to_string(), "snoeien".to_string()]),
            specializations: StringList::default(),
            recent_projects: StringList::default(),
            employee_estimate: None,
            pitch: None,
            pitch_generated_at: None,
            call_status: CallStatus::NotCalled,
            call_notes: None,
            called_at: None,
            scraped_at: Utc::now().into(),
            enriched_at: None,
            status: LeadStatus::Scraped,
            dedupe_key: "groentotaal|rotterdam".to_string(),
        }
    }

    #[test]
    fn header_row_comes_first() {
        let csv = leads_to_csv(&[]);
        assert_eq!(
            csv,
            "Bedrijfsnaam,Eigenaar,Telefoon,Website,Stad,Adres,Google Rating,Reviews,\
             Diensten,Specialisaties,Medewerkers,Pitch,Bel Status,Notities,Status\r\n"
        );
    }

    #[test]
    fn absent_values_render_as_empty_fields() {
        let csv = leads_to_csv(&[lead()]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("GroenTotaal,,+31 10 1234567,"));
        assert!(row.ends_with(",not_called,,scraped"));
    }

    #[test]
    fn joined_lists_are_quoted() {
        let csv = leads_to_csv(&[lead()]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"tuinaanleg, snoeien\""));
    }

    #[test]
    fn embedded_quotes_and_newlines_are_escaped() {
        let mut lead = lead();
        lead.pitch = Some("Goedemorgen!\nU zei \"ja\".".to_string());
        let csv = leads_to_csv(&[lead]);
        assert!(csv.contains("\"Goedemorgen!\nU zei \"\"ja\"\".\""));
    }

    #[test]
    fn filename_has_timestamp_shape() {
        let name = export_filename();
        assert!(name.starts_with("leads_export_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "leads_export_YYYYMMDD_HHMMSS.csv".len());
    }
}
