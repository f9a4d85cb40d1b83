use roster_db::Position;

/// Label spellings accepted on import, after case and umlaut folding and with any gender
/// marker removed.
const SYNONYMS: &[(&str, Position)] = &[
    ("position nicht gewaehlt", Position::Unset),
    ("stuermer", Position::Forward),
    ("stuermerin", Position::Forward),
    ("forward", Position::Forward),
    ("fwd", Position::Forward),
    ("wing", Position::Forward),
    ("winger", Position::Forward),
    ("fluegel", Position::Forward),
    ("center", Position::Center),
    ("centre", Position::Center),
    ("verteidiger", Position::Defense),
    ("verteidigerin", Position::Defense),
    ("defense", Position::Defense),
    ("defence", Position::Defense),
    ("defender", Position::Defense),
    ("goali", Position::Goalie),
    ("goalie", Position::Goalie),
    ("torwart", Position::Goalie),
    ("torwartin", Position::Goalie),
    ("torhueter", Position::Goalie),
    ("torhueterin", Position::Goalie),
    ("keeper", Position::Goalie),
    ("goalkeeper", Position::Goalie),
    ("goaltender", Position::Goalie),
];

const GENDER_MARKERS: &[&str] = &["*in", ":in", "_in", "/in", "(in)"];

/// Map a free-form position value to a position. Accepts the numeric codes 1 through 5 or
/// any known label. Anything else, including an empty value, is `Position::Unset`.
pub fn normalize_position(value: &str) -> Position {
    let value = value.trim();
    if let Some(position) = parse_code(value).and_then(Position::from_code) {
        return position;
    }

    let label = fold_label(value);
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == label)
        .map(|(_, position)| *position)
        .unwrap_or_default()
}

/// Like [normalize_position], for a cell that may be missing entirely.
pub fn normalize_optional_position(value: Option<&str>) -> Position {
    value.map(normalize_position).unwrap_or_default()
}

/// Spreadsheets often write whole numbers as `2.0`.
fn parse_code(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        let number = value.parse::<f64>().ok()?;
        (number.fract() == 0.0 && (1.0..=5.0).contains(&number)).then_some(number as i64)
    })
}

fn fold_label(value: &str) -> String {
    let mut folded = String::with_capacity(value.len() + 4);
    for c in value.trim().to_lowercase().chars() {
        match c {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'ß' => folded.push_str("ss"),
            c => folded.push(c),
        }
    }

    for marker in GENDER_MARKERS {
        if let Some(stripped) = folded.strip_suffix(marker) {
            return stripped.trim_end().to_string();
        }
    }

    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_codes_pass_through() {
        for code in 1..=5 {
            let expected = Position::from_code(code).unwrap();
            assert_eq!(normalize_position(&code.to_string()), expected);
            assert_eq!(normalize_position(&format!(" {code} ")), expected);
            assert_eq!(normalize_position(&format!("{code}.0")), expected);
        }
    }

    #[test]
    fn out_of_range_codes_are_unset() {
        for value in ["0", "6", "-2", "42", "2.5", "6.0", "NaN", "inf"] {
            assert_eq!(normalize_position(value), Position::Unset, "{value}");
        }
    }

    #[test]
    fn labels() {
        let cases = [
            ("Stürmer*in", Position::Forward),
            ("STÜRMER", Position::Forward),
            ("stuermer*in", Position::Forward),
            ("Stürmerin", Position::Forward),
            ("Forward", Position::Forward),
            ("Center*in", Position::Center),
            ("center", Position::Center),
            ("Verteidiger*in", Position::Defense),
            ("Verteidiger:in", Position::Defense),
            ("defence", Position::Defense),
            ("Goali", Position::Goalie),
            ("goalie", Position::Goalie),
            ("Torwart*in", Position::Goalie),
            ("Torhüterin", Position::Goalie),
            ("Keeper", Position::Goalie),
            ("Goaltender", Position::Goalie),
            ("Position nicht gewählt", Position::Unset),
        ];

        for (label, expected) in cases {
            assert_eq!(normalize_position(label), expected, "{label}");
        }
    }

    #[test]
    fn every_display_label_maps_to_itself() {
        for position in Position::ALL {
            assert_eq!(normalize_position(position.label()), position);
        }
    }

    #[test]
    fn unknown_and_empty_are_unset() {
        for value in ["", "   ", "striker", "Stürmer*innen", "ü", "*in"] {
            assert_eq!(normalize_position(value), Position::Unset, "{value:?}");
        }
        assert_eq!(normalize_optional_position(None), Position::Unset);
    }
}
