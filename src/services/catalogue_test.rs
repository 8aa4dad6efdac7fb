use super::*;
use std::collections::HashSet;

#[test]
fn lva_names_are_unique_and_non_blank() {
    let unique: HashSet<&str> = LVA_NAMES.iter().copied().collect();
    assert_eq!(unique.len(), LVA_NAMES.len());
    assert!(LVA_NAMES.iter().all(|n| !n.trim().is_empty()));
    assert_eq!(LVA_NAMES.len(), 119);
}

#[test]
fn every_program_references_a_known_category() {
    let categories: HashSet<&str> = STUDY_CATEGORIES.iter().map(|(name, ..)| *name).collect();
    for (category, programs) in STUDY_PROGRAMS {
        assert!(categories.contains(category), "unknown category {category}");
        assert!(!programs.is_empty());
    }
}

#[test]
fn every_update_references_a_known_program() {
    let programs: HashSet<&str> = STUDY_PROGRAMS.iter().flat_map(|(_, p)| p.iter().copied()).collect();
    for (program, items) in STUDY_UPDATES {
        assert!(programs.contains(program), "unknown program {program}");
        assert!(!items.is_empty());
    }
}
