use once_cell::sync::Lazy;
use regex::Regex;

/// Label shown for players that belong to no team.
pub const NO_TEAM: &str = "No team";

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#[0-9a-fA-F]{6}").expect("valid hex color pattern"));
static STYLE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&[0-9a-fk-orA-FK-OR]").expect("valid style code pattern"));

/// Removes `&#rrggbb` and `&x` formatting codes and trims the result.
/// Empty input comes back untouched.
pub fn strip_colors(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let without_hex = HEX_COLOR.replace_all(raw, "");
    STYLE_CODE.replace_all(&without_hex, "").trim().to_string()
}

/// Picks the label to show for a team: the decorated display name when it
/// survives colour stripping, otherwise the raw team identifier.
pub fn team_display(team: Option<&str>, display_raw: Option<&str>) -> String {
    let team = match team {
        Some(team) if !team.is_empty() => team,
        _ => return NO_TEAM.to_string(),
    };

    match display_raw.map(strip_colors) {
        Some(clean) if !clean.is_empty() => clean,
        _ => team.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_hex_and_style_codes() {
        assert_eq!(strip_colors("&#FF5555Red &lTeam"), "Red Team");
        assert_eq!(strip_colors("&c&lRed Team"), "Red Team");
        assert_eq!(strip_colors("  &a&#00ff00Green&r  "), "Green");
        assert_eq!(strip_colors("&K&OBold"), "Bold");
    }

    #[test]
    fn leaves_other_ampersands_alone() {
        assert_eq!(strip_colors("Salt & Pepper"), "Salt & Pepper");
        assert_eq!(strip_colors("&zNope"), "&zNope");
        assert_eq!(strip_colors("&#12345Short"), "&#12345Short");
    }

    #[test]
    fn empty_input_is_unchanged() {
        assert_eq!(strip_colors(""), "");
    }

    #[test]
    fn output_contains_no_codes() {
        for input in ["&1&2&3x", "a&#abcdefb&kc", "&#&#1234567", " &#000000&r "] {
            let out = strip_colors(input);
            assert!(!HEX_COLOR.is_match(&out), "{input:?} -> {out:?}");
            assert!(!STYLE_CODE.is_match(&out), "{input:?} -> {out:?}");
            assert_eq!(out, out.trim());
        }
        assert_eq!(strip_colors("a&#abcdefb&kc"), "abc");
        assert_eq!(strip_colors("&#&#1234567"), "&#7");
    }

    #[test]
    fn no_team_sentinel() {
        assert_eq!(team_display(None, Some("&cRed")), NO_TEAM);
        assert_eq!(team_display(Some(""), None), NO_TEAM);
    }

    #[test]
    fn falls_back_to_identifier() {
        assert_eq!(team_display(Some("redteam"), None), "redteam");
        assert_eq!(team_display(Some("redteam"), Some("")), "redteam");
        assert_eq!(team_display(Some("redteam"), Some("&c")), "redteam");
        assert_eq!(team_display(Some("redteam"), Some("  &l ")), "redteam");
    }

    #[test]
    fn decorated_name_wins() {
        assert_eq!(team_display(Some("redteam"), Some("&c&lRed Team")), "Red Team");
    }
}
