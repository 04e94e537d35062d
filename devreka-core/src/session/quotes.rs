//! Messages rotated under the loading indicator

use rand::Rng;

const QUOTES: &[&str] = &[
    "Preparing a revolutionary idea...",
    "Searching the universe of creativity...",
    "Cooking up something incredible for you...",
    "Your next big project is on its way...",
    "Unleashing the power of artificial intelligence...",
    "Turning coffee into code and a great idea...",
    "Tuning the algorithms of inspiration...",
    "The wait will be worth it",
    "Almost there....",
    "Coming...",
    "Hold on, the magic is about to happen",
    "This is like installing Debian: it goes fast",
    "Don't worry, no jQuery was harmed",
    "This is taking longer than Morpheus' speeches in The Matrix",
    "I'm running out of nice texts...",
];

/// Picks quotes at random, never the same one twice in a row
#[derive(Debug, Default)]
pub struct QuoteRotator {
    last: Option<usize>,
}

impl QuoteRotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_quote(&mut self) -> &'static str {
        self.next_with(&mut rand::thread_rng())
    }

    fn next_with<R: Rng>(&mut self, rng: &mut R) -> &'static str {
        let mut index = rng.gen_range(0..QUOTES.len());
        while Some(index) == self.last {
            index = rng.gen_range(0..QUOTES.len());
        }
        self.last = Some(index);
        QUOTES[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_repeats_consecutively() {
        let mut rotator = QuoteRotator::new();
        let mut previous = rotator.next_quote();
        for _ in 0..200 {
            let quote = rotator.next_quote();
            assert_ne!(quote, previous);
            previous = quote;
        }
    }
}
