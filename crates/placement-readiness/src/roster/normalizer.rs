/// Canonical branch code for the messy spellings that show up in exported
/// rosters ("Computer Science", "ENTC", stray zero-width characters).
pub(crate) fn normalize_branch(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    match collapsed.as_str() {
        "CS" | "CSE" | "COMPUTER SCIENCE" => "CSE".to_string(),
        "IT" | "INFORMATION TECHNOLOGY" => "IT".to_string(),
        "EC" | "ENTC" | "ECS" | "ELECTRONICS" => "ECS".to_string(),
        _ => collapsed,
    }
}

/// Maps the year-of-study spellings in circulation onto 1-4.
pub(crate) fn normalize_year(value: &str) -> Option<u8> {
    match value.trim().to_lowercase().as_str() {
        "1" | "i" | "fy" | "fe" | "first year" | "1st year" => Some(1),
        "2" | "ii" | "sy" | "se" | "second year" | "2nd year" => Some(2),
        "3" | "iii" | "ty" | "te" | "third year" | "3rd year" => Some(3),
        "4" | "iv" | "be" | "final" | "final year" | "fourth year" | "4th year" => Some(4),
        _ => None,
    }
}

/// Splits a roster skills cell ("Python; SQL, React") into clean entries.
pub(crate) fn split_skills(value: &str) -> Vec<String> {
    value
        .split([';', ','])
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}
