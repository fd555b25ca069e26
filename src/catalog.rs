// src/catalog.rs

/// Known procedure codes and their descriptions, in output order.
pub const CODE_CATALOG: &[(&str, &str)] = &[
    ("97151", "Behavior Identification Assessment (per 15 min)"),
    (
        "97152",
        "Behavior Identification Support Assessment (per 15 min)",
    ),
    (
        "97153",
        "Adaptive Behavior Treatment by Protocol (Direct 1:1) (per 15 min)",
    ),
    (
        "97154",
        "Group Adaptive Behavior Treatment by Protocol (per 15 min)",
    ),
    (
        "97155",
        "Adaptive Behavior Treatment with Protocol Modification (Supervision) (per 15 min)",
    ),
    (
        "97156",
        "Family Adaptive Behavior Treatment Guidance (Parent Training) (per 15 min)",
    ),
    (
        "97157",
        "Multiple-family Group Adaptive Behavior Treatment Guidance (per 15 min)",
    ),
    (
        "97158",
        "Group Adaptive Behavior Treatment with Protocol Modification (per 15 min)",
    ),
];

/// Look up the description for `code`, if it is a known code.
pub fn describe(code: &str) -> Option<&'static str> {
    CODE_CATALOG
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
}
