use rand::{Rng, seq::SliceRandom};

const THANKS: &[&str] = &[
    "See you next time!",
    "Hellothankyouforwatching! Hellothankyouforwatching!",
    "Good-bye!",
    "Thanks for tagging with albumtag!",
    "Until next time!",
    "See you soon!",
];

/// Closing line printed after a successful run
pub fn farewell<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    THANKS.choose(rng).copied().unwrap_or("Good-bye!")
}
