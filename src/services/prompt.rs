//! Pitch prompt construction.
//!
//! Fixed Dutch sales-pitch template formatted with a lead's attributes.
//! Absent attributes get explicit placeholder wording so the model never
//! sees an empty slot.

use crate::models::lead::Model as LeadModel;

/// Build the pitch prompt for one lead.
pub fn build_pitch_prompt(lead: &LeadModel) -> String {
    let specializations = if lead.specializations.is_empty() {
        "onbekend".to_string()
    } else {
        lead.specializations.joined()
    };
    let services = if lead.services.is_empty() {
        "hoveniersdiensten".to_string()
    } else {
        lead.services.joined()
    };
    let recent_projects = if lead.recent_projects.is_empty() {
        "geen bekend".to_string()
    } else {
        lead.recent_projects.joined()
    };
    let description = lead
        .description
        .as_deref()
        .unwrap_or("geen beschrijving beschikbaar");

    format!(
        "Je bent een sales specialist voor Uitbrekers.nl.\n\
         \n\
         ## Over Uitbrekers.nl\n\
         Wij helpen hoveniers door tuinen leeg te halen voor een vaste prijs per vierkante \
         meter. Dit bespaart hoveniers tijd en zorgt voor voorspelbare kosten bij snoei-, \
         renovatie- en herinrichtingsprojecten.\n\
         \n\
         ## Opdracht\n\
         Schrijf een telefonische openingspitch van MAXIMAAL 75 woorden (~30 seconden \
         spreektijd).\n\
         \n\
         ## Bedrijfsgegevens\n\
         - Naam: {company_name}\n\
         - Plaats: {city}\n\
         - Specialisaties: {specializations}\n\
         - Diensten: {services}\n\
         - Recente projecten: {recent_projects}\n\
         - Website beschrijving: {description}\n\
         \n\
         ## Eisen aan de pitch\n\
         1. Begin met een korte, professionele groet\n\
         2. Noem specifiek iets van HUN bedrijf (specialisatie, project, of dienst)\n\
         3. Benoem kort het probleem (groenafval kost tijd/geld)\n\
         4. Presenteer onze oplossing (vaste m\u{b2} prijs, geen verrassingen)\n\
         5. Eindig met een open vraag om interesse te peilen\n\
         6. GEEN \"ik zag op uw website\" - dat klinkt stalkerig\n\
         7. Spreektaal, geen formele schrijftaal\n\
         \n\
         ## Voorbeeld structuur\n\
         [Groet] + [Specifieke referentie hun bedrijf] + [Probleem] + [Oplossing] + [Vraag]\n\
         \n\
         Geef ALLEEN de pitch terug, zonder aanhalingstekens of extra uitleg.",
        company_name = lead.company_name,
        city = lead.city,
        specializations = specializations,
        services = services,
        recent_projects = recent_projects,
        description = description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::{CallStatus, LeadStatus, StringList};
    use chrono::Utc;
    use uuid::Uuid;

    fn lead() -> LeadModel {
        LeadModel {
            id: Uuid::new_v4(),
            source: "google_maps".to_string(),
            company_name: "GroenTotaal".to_string(),
            address: "Lange Laan 1".to_string(),
            city: "Rotterdam".to_string(),
            postal_code: "3011 AB".to_string(),
            phone: None,
            website: None,
            google_rating: None,
            review_count: None,
            owner_name: None,
            contact_person: None,
            description: None,
            services: StringList::default(),
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
    fn prompt_includes_company_attributes() {
        let mut lead = lead();
        lead.services = StringList(vec!["tuinaanleg".to_string(), "snoeien".to_string()]);
        lead.description = Some("Familiebedrijf sinds 1985".to_string());

        let prompt = build_pitch_prompt(&lead);
        assert!(prompt.contains("- Naam: GroenTotaal"));
        assert!(prompt.contains("- Plaats: Rotterdam"));
        assert!(prompt.contains("- Diensten: tuinaanleg, snoeien"));
        assert!(prompt.contains("Familiebedrijf sinds 1985"));
    }

    #[test]
    fn prompt_uses_placeholders_for_missing_attributes() {
        let prompt = build_pitch_prompt(&lead());
        assert!(prompt.contains("- Specialisaties: onbekend"));
        assert!(prompt.contains("- Diensten: hoveniersdiensten"));
        assert!(prompt.contains("- Recente projecten: geen bekend"));
        assert!(prompt.contains("geen beschrijving beschikbaar"));
    }
}
