//! Discovery catchphrases and motivational quotes

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Shown briefly when the special coin is tapped
pub const CATCHPHRASES: [&str; 5] = ["GOTCHA! 💥", "BINGO! 🎯", "YES! ✨", "POW! ⚡️", "FOUND! 🪙"];

/// Fallback if the catalogue is ever empty
const FALLBACK_CATCHPHRASE: &str = "found it";

/// A quote revealed by the special coin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
    pub character: String,
    pub series: String,
}

impl Quote {
    fn new(quote: &str, character: &str, series: &str) -> Self {
        Self {
            quote: quote.to_string(),
            character: character.to_string(),
            series: series.to_string(),
        }
    }
}

const QUOTES: [(&str, &str, &str); 10] = [
    (
        "It's not the face that makes someone a monster, it's the choices they make with their lives.",
        "Naruto Uzumaki",
        "Naruto",
    ),
    (
        "Whatever you lose, you'll find it again. But what you throw away you'll never get back.",
        "Himura Kenshin",
        "Rurouni Kenshin",
    ),
    (
        "Power comes in response to a need, not a desire. You have to create that need.",
        "Goku",
        "Dragon Ball Z",
    ),
    (
        "If you don't like your destiny, don't accept it. Instead, have the courage to change it.",
        "Naruto Uzumaki",
        "Naruto",
    ),
    (
        "A person can change, at the moment when the person wishes to change.",
        "Haruhi Fujioka",
        "Ouran High School Host Club",
    ),
    (
        "Hard work is worthless for those that don't believe in themselves.",
        "Naruto Uzumaki",
        "Naruto",
    ),
    (
        "To know sorrow is not terrifying. What is terrifying is to know you can't go back to happiness you could have.",
        "Matsumoto Rangiku",
        "Bleach",
    ),
    ("Giving up is what kills people.", "Alucard", "Hellsing"),
    (
        "The world isn't perfect. But it's there for us, doing the best it can... that's what makes it so damn beautiful.",
        "Roy Mustang",
        "Fullmetal Alchemist",
    ),
    (
        "If you don't take risks, you can't create a future.",
        "Monkey D. Luffy",
        "One Piece",
    ),
];

/// Number of quotes in the catalogue
pub fn quote_count() -> usize {
    QUOTES.len()
}

/// Pick a random catchphrase
pub fn random_catchphrase<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CATCHPHRASES
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_CATCHPHRASE)
}

/// Pick a random quote
pub fn random_quote<R: Rng + ?Sized>(rng: &mut R) -> Quote {
    let idx = rng.random_range(0..QUOTES.len());
    let (quote, character, series) = QUOTES[idx];
    Quote::new(quote, character, series)
}
