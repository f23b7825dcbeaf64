//! Random password generation.

use rand::seq::SliceRandom;
use rand::Rng;

pub const MIN_LENGTH: u8 = 8;
pub const MAX_LENGTH: u8 = 32;
pub const DEFAULT_LENGTH: u8 = 16;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: u8,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

impl GeneratorOptions {
    pub fn with_length(mut self, length: u8) -> Self {
        self.length = length.clamp(MIN_LENGTH, MAX_LENGTH);
        self
    }

    pub fn lengthen(&mut self) {
        self.length = self.length.saturating_add(1).min(MAX_LENGTH);
    }

    pub fn shorten(&mut self) {
        self.length = self.length.saturating_sub(1).max(MIN_LENGTH);
    }
}

/// Generate a password. Lowercase letters are always in the pool; every
/// enabled class contributes at least one character.
pub fn generate(options: &GeneratorOptions) -> String {
    generate_with(options, &mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(options: &GeneratorOptions, rng: &mut R) -> String {
    let length = options.length.clamp(MIN_LENGTH, MAX_LENGTH) as usize;

    let mut pool: Vec<char> = LOWERCASE.chars().collect();
    let mut password: Vec<char> = Vec::with_capacity(length);

    for (enabled, class) in [
        (options.uppercase, UPPERCASE),
        (options.digits, DIGITS),
        (options.symbols, SYMBOLS),
    ] {
        if !enabled {
            continue;
        }
        let chars: Vec<char> = class.chars().collect();
        if let Some(c) = chars.choose(rng) {
            password.push(*c);
        }
        pool.extend(chars);
    }

    while password.len() < length {
        if let Some(c) = pool.choose(rng) {
            password.push(*c);
        }
    }

    password.shuffle(rng);
    password.into_iter().collect()
}
