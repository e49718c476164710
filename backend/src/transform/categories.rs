//! Technology label → category lookup.
//!
//! Matching is exact (case and whitespace included). Anything not in the
//! table is bucketed into [`OTHER_CATEGORY`]; that is never an error.

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

/// Category for labels missing from the table.
pub const OTHER_CATEGORY: &str = "Other";

/// Raw technology label and the category it belongs to.
pub const TECHNOLOGY_CATEGORIES: [(&str, &str); 24] = [
    ("Development - CMS Backend", "Web Development"),
    ("Development - CMS Frontend", "Web Development"),
    ("Development - Backend", "Web Development"),
    ("Adobe Experience Manager", "Web Development"),
    ("Development - Frontend", "Web Development"),
    ("Development - FullStack", "Web Development"),
    ("Game Development", "Software Development"),
    ("DevOps", "Infrastructure"),
    ("Mulesoft", "Integration Solutions"),
    ("Business Intelligence", "Data Analysis"),
    ("Business Analytics / Project Management", "Data Analysis"),
    ("Data Engineer", "Data Engineering"),
    ("Database Administration", "Database Management"),
    ("QA Manual", "Quality Assurance"),
    ("QA Automation", "Quality Assurance"),
    ("Security", "Cybersecurity"),
    ("Security Compliance", "Cybersecurity"),
    ("System Administration", "Infrastructure"),
    ("Design", "Creative & Design"),
    ("Client Success", "Customer Support"),
    ("Social Media Community Management", "Digital Marketing"),
    ("Technical Writing", "Documentation"),
    ("Sales", "Sales & Marketing"),
    ("Salesforce", "Sales & Marketing"),
];

static CATEGORY_BY_LABEL: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| TECHNOLOGY_CATEGORIES.iter().copied().collect());

/// Category of a raw technology label, or `"Other"`.
pub fn categorize(label: &str) -> &'static str {
    CATEGORY_BY_LABEL.get(label).copied().unwrap_or(OTHER_CATEGORY)
}

/// Whether `label` has an explicit entry.
pub fn is_mapped(label: &str) -> bool {
    CATEGORY_BY_LABEL.contains_key(label)
}

/// Distinct category names, sorted, without the fallback.
pub fn category_names() -> Vec<&'static str> {
    TECHNOLOGY_CATEGORIES
        .iter()
        .map(|(_, category)| *category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Human-readable listing of the mapping, grouped by category.
pub fn mapping_description() -> String {
    let mut out = String::from("Technology categories:\n");
    for category in category_names() {
        out.push_str(&format!("\n  {}\n", category));
        for (label, _) in TECHNOLOGY_CATEGORIES.iter().filter(|(_, c)| *c == category) {
            out.push_str(&format!("    - {}\n", label));
        }
    }
    out.push_str(&format!("\n  {}\n    - (any other label)\n", OTHER_CATEGORY));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_maps_exactly() {
        for (label, category) in TECHNOLOGY_CATEGORIES {
            assert_eq!(categorize(label), category, "label {}", label);
        }
    }

    #[test]
    fn test_unmapped_is_other() {
        assert_eq!(categorize("Underwater Basket Weaving"), "Other");
        assert_eq!(categorize(""), "Other");
        assert!(!is_mapped("Underwater Basket Weaving"));
    }

    #[test]
    fn test_match_is_exact() {
        assert_eq!(categorize("devops"), "Other");
        assert_eq!(categorize(" DevOps"), "Other");
        assert_eq!(categorize("DevOps"), "Infrastructure");
    }

    #[test]
    fn test_labels_are_unique() {
        assert_eq!(CATEGORY_BY_LABEL.len(), TECHNOLOGY_CATEGORIES.len());
    }

    #[test]
    fn test_category_names() {
        let names = category_names();
        assert_eq!(names.len(), 14);
        assert!(names.contains(&"Creative & Design"));
        assert!(!names.contains(&OTHER_CATEGORY));
    }

    #[test]
    fn test_description_lists_labels() {
        let text = mapping_description();
        assert!(text.contains("Mulesoft"));
        assert!(text.contains("Integration Solutions"));
        assert!(text.contains("(any other label)"));
    }
}
