/// Trims and collapses inner whitespace to single spaces.
pub fn normalize_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase slug with diacritics stripped and whitespace runs replaced by `-`.
pub fn slugify(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| word.chars().map(fold_diacritic).collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ā' => 'A',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ę' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' | 'Ē' | 'Ę' => 'E',
        'í' | 'ì' | 'î' | 'ï' | 'ī' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' | 'Ī' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ō' => 'O',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ū' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_diacritics_and_joins_words() {
        assert_eq!(slugify("  Artículos   de Niño "), "articulos-de-nino");
        assert_eq!(slugify("Servicio"), "servicio");
    }

    #[test]
    fn name_whitespace_is_collapsed() {
        assert_eq!(normalize_name("  Ropa \t de   Verano "), "Ropa de Verano");
    }
}
