use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Number of tiles in a freshly filled bag.
pub const STANDARD_TILE_COUNT: usize = 100;

/// Standard Scrabble letter values
pub static LETTER_VALUES: Lazy<HashMap<char, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // 1 point letters
    for ch in ['A', 'E', 'I', 'O', 'U', 'L', 'N', 'R', 'S', 'T'] {
        map.insert(ch, 1);
    }

    // 2 points
    for ch in ['D', 'G'] {
        map.insert(ch, 2);
    }

    // 3 points
    for ch in ['B', 'C', 'M', 'P'] {
        map.insert(ch, 3);
    }

    // 4 points
    for ch in ['F', 'H', 'V', 'W', 'Y'] {
        map.insert(ch, 4);
    }

    // 5 points
    map.insert('K', 5);

    // 8 points
    for ch in ['J', 'X'] {
        map.insert(ch, 8);
    }

    // 10 points
    for ch in ['Q', 'Z'] {
        map.insert(ch, 10);
    }

    map
});

/// Tile counts for a full bag.
///
/// English Scrabble counts without blanks; the two blank slots are given to
/// E and S so the supply still totals 100.
pub static TILE_DISTRIBUTION: Lazy<Vec<(char, usize)>> = Lazy::new(|| {
    vec![
        ('A', 9),
        ('B', 2),
        ('C', 2),
        ('D', 4),
        ('E', 13),
        ('F', 2),
        ('G', 3),
        ('H', 2),
        ('I', 9),
        ('J', 1),
        ('K', 1),
        ('L', 4),
        ('M', 2),
        ('N', 6),
        ('O', 8),
        ('P', 2),
        ('Q', 1),
        ('R', 6),
        ('S', 5),
        ('T', 6),
        ('U', 4),
        ('V', 2),
        ('W', 2),
        ('X', 1),
        ('Y', 2),
        ('Z', 1),
    ]
});

/// Get the point value for a letter. Anything outside A-Z is worth nothing.
pub fn get_letter_value(letter: char) -> u32 {
    let upper = letter.to_ascii_uppercase();
    LETTER_VALUES.get(&upper).copied().unwrap_or(0)
}

/// Expand the distribution table into the full multiset of tiles.
pub fn standard_tile_supply() -> Vec<char> {
    TILE_DISTRIBUTION
        .iter()
        .flat_map(|(ch, count)| std::iter::repeat(*ch).take(*count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_values() {
        assert_eq!(get_letter_value('E'), 1);
        assert_eq!(get_letter_value('Q'), 10);
        assert_eq!(get_letter_value('X'), 8);
        assert_eq!(get_letter_value('D'), 2);
        assert_eq!(get_letter_value('h'), 4);
        assert_eq!(get_letter_value('?'), 0);
    }

    #[test]
    fn test_all_letters_have_values() {
        assert_eq!(LETTER_VALUES.len(), 26);
        assert!(('A'..='Z').all(|ch| LETTER_VALUES.contains_key(&ch)));
    }

    #[test]
    fn test_standard_supply_totals_one_hundred() {
        let supply = standard_tile_supply();
        assert_eq!(supply.len(), STANDARD_TILE_COUNT);
        assert_eq!(TILE_DISTRIBUTION.len(), 26);
        assert_eq!(supply.iter().filter(|&&ch| ch == 'E').count(), 13);
        assert_eq!(supply.iter().filter(|&&ch| ch == 'Z').count(), 1);
    }
}
