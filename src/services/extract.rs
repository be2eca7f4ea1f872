//! Heuristic extraction of business attributes from crawled page text.
//!
//! The crawler provider returns readable text; this module turns it into the
//! structured enrichment attributes (description, services, specializations,
//! recent projects, owner name, employee estimate). The heuristics target
//! Dutch landscaping-company websites and are deliberately keyword-based;
//! they favour precision over recall.

use std::sync::LazyLock;

use regex::Regex;

use crate::repositories::EnrichmentData;

const SERVICE_KEYWORDS: &[&str] = &[
    "tuinaanleg",
    "tuinonderhoud",
    "snoeien",
    "grasmaaien",
    "bestrating",
    "vijveraanleg",
    "beplanting",
    "schutting",
    "terras",
    "gazon",
    "haag",
    "heggen",
    "bomen",
    "struiken",
    "groenonderhoud",
    "tuinontwerp",
    "tuinrenovatie",
    "sierbestrating",
    "drainage",
    "beregening",
];

const SPECIALIZATION_KEYWORDS: &[(&str, &str)] = &[
    ("moderne tuinen", "moderne tuinen"),
    ("klassieke tuinen", "klassieke tuinen"),
    ("kleine tuinen", "kleine tuinen"),
    ("grote tuinen", "grote tuinen"),
    ("duurzaam", "duurzaam"),
    ("ecologisch", "ecologisch"),
    ("onderhoudsvri", "onderhoudsvrij"),
    ("kindvriendel", "kindvriendelijk"),
    ("zakelijk", "zakelijke tuinen"),
    ("particulier", "particuliere tuinen"),
    ("natuurlijk", "natuurlijke tuinen"),
];

static DESCRIPTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)over ons[:\s]*(.{50,300})",
        r"(?i)wie zijn wij[:\s]*(.{50,300})",
        r"(?i)welkom[:\s]*(.{50,300})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid description pattern"))
    .collect()
});

static PROJECT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)project[:\s]+([^.\n]{20,100})",
        r"(?i)realisatie[:\s]+([^.\n]{20,100})",
        r"(?i)uitgevoerd[:\s]+([^.\n]{20,100})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid project pattern"))
    .collect()
});

static OWNER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i:eigenaar)[:\s]+([A-Z][a-z]+ (?:van (?:de |den |der )?)?[A-Z][a-z]+)",
        r"(?i:contact)[:\s]+([A-Z][a-z]+ (?:van (?:de |den |der )?)?[A-Z][a-z]+)",
        r"(?:door|bij) ([A-Z][a-z]+ (?:van (?:de |den |der )?)?[A-Z][a-z]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid owner pattern"))
    .collect()
});

static EMPLOYEE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)\s*(?:medewerkers|werknemers|vakmensen|collega)",
        r"team\s*(?:van|met)\s*(\d+)",
        r"(\d+)\s*man\s*(?:sterk|team)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid employee pattern"))
    .collect()
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Extract structured business attributes from combined page text.
pub fn extract_business_info(content: &str) -> EnrichmentData {
    if content.is_empty() {
        return EnrichmentData::default();
    }

    let content_lower = content.to_lowercase();

    EnrichmentData {
        description: extract_description(content),
        services: extract_services(&content_lower),
        specializations: extract_specializations(&content_lower),
        recent_projects: extract_projects(content),
        owner_name: extract_owner_name(content),
        contact_person: None,
        employee_estimate: estimate_employees(&content_lower),
    }
}

fn clean(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").to_string()
}

fn truncate_chars(text: String, max: usize) -> String {
    if text.chars().count() > max {
        text.chars().take(max).collect()
    } else {
        text
    }
}

/// First "about us" style section, else the first substantial paragraph.
fn extract_description(content: &str) -> Option<String> {
    for pattern in DESCRIPTION_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(content)
            && let Some(matched) = captures.get(1)
        {
            return Some(truncate_chars(clean(matched.as_str()), 500));
        }
    }

    content
        .split("\n\n")
        .find(|para| para.len() > 100 && !para.starts_with('#'))
        .map(|para| truncate_chars(clean(para), 500))
}

fn extract_services(content_lower: &str) -> Vec<String> {
    SERVICE_KEYWORDS
        .iter()
        .filter(|keyword| content_lower.contains(*keyword))
        .take(10)
        .map(|keyword| keyword.to_string())
        .collect()
}

fn extract_specializations(content_lower: &str) -> Vec<String> {
    SPECIALIZATION_KEYWORDS
        .iter()
        .filter(|(keyword, _)| content_lower.contains(keyword))
        .take(5)
        .map(|(_, label)| label.to_string())
        .collect()
}

fn extract_projects(content: &str) -> Vec<String> {
    let mut projects = Vec::new();
    for pattern in PROJECT_PATTERNS.iter() {
        for captures in pattern.captures_iter(content).take(3) {
            if let Some(matched) = captures.get(1) {
                let cleaned = clean(matched.as_str());
                if !cleaned.is_empty() && !projects.contains(&cleaned) {
                    projects.push(cleaned);
                }
            }
        }
        if projects.len() >= 5 {
            break;
        }
    }
    projects.truncate(5);
    projects
}

fn extract_owner_name(content: &str) -> Option<String> {
    OWNER_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Explicit team-size mentions first, then weaker indicator phrases.
fn estimate_employees(content_lower: &str) -> Option<i32> {
    for pattern in EMPLOYEE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(content_lower)
            && let Some(matched) = captures.get(1)
            && let Ok(count) = matched.as_str().parse::<i32>()
        {
            return Some(count);
        }
    }

    if content_lower.contains("eenmanszaak") || content_lower.contains("zzp") {
        return Some(1);
    }
    if content_lower.contains("klein team") {
        return Some(3);
    }
    if content_lower.contains("groot team") {
        return Some(10);
    }

    None
}
