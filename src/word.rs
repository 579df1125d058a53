use std::fmt;

use crate::charset::{decode_char, encode_char};
use crate::error::WordError;
use crate::field::FieldSpec;
use crate::sign::Sign;

/// `64^5 - 1`, the largest magnitude a MIX word can hold.
pub const MAX: i64 = 1_073_741_823;

const BYTE_RADIX: i64 = 64;

/// A MIX word: a sign plus five base-64 "bytes". Value-copied on
/// assignment like the teacher's `Register` union, but modeled as an
/// explicit struct (rather than a transmuted integer) so that `+0` and
/// `-0` stay distinguishable through every operation, including
/// sign-only field extraction — see spec.md §9.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Word {
    sign: Sign,
    bytes: [u8; 5],
}

impl Word {
    /// Positive zero: the value every register and memory cell starts at.
    pub const ZERO: Word = Word {
        sign: Sign::Plus,
        bytes: [0; 5],
    };

    /// Construct a word from an explicit sign and five bytes, each
    /// required to be in `0..=63`.
    pub fn new(sign: Sign, bytes: [u8; 5]) -> Result<Word, WordError> {
        for &b in &bytes {
            if b > 63 {
                return Err(WordError::ByteRange { byte: i64::from(b) });
            }
        }
        Ok(Word { sign, bytes })
    }

    /// Construct a word from an integer. `0` always yields `+0`; any other
    /// `n` with `|n| <= MAX` preserves `sign(n)`. Fails with
    /// [`WordError::Overflow`] if `|n| > MAX`.
    pub fn from_int(n: i64) -> Result<Word, WordError> {
        let magnitude = n.abs();
        if magnitude > MAX {
            return Err(WordError::Overflow { value: n });
        }

        let sign = if n < 0 { Sign::Minus } else { Sign::Plus };
        let mut bytes = [0u8; 5];
        let mut remaining = magnitude;
        for i in (0..5).rev() {
            bytes[i] = (remaining % BYTE_RADIX) as u8;
            remaining /= BYTE_RADIX;
        }

        Ok(Word { sign, bytes })
    }

    /// The word's value as a signed integer. `+0` and `-0` both convert
    /// to `0`.
    pub fn to_int(self) -> i64 {
        let magnitude = self
            .bytes
            .iter()
            .fold(0i64, |acc, &b| acc * BYTE_RADIX + i64::from(b));
        self.sign.multiplier() * magnitude
    }

    pub fn sign(self) -> Sign {
        self.sign
    }

    pub fn is_negative(self) -> bool {
        self.sign.is_negative()
    }

    /// The raw byte at position `1..=5` (left to right).
    pub fn byte(self, position: u8) -> u8 {
        self.bytes[(position - 1) as usize]
    }

    pub fn bytes(self) -> [u8; 5] {
        self.bytes
    }

    pub fn with_sign(self, sign: Sign) -> Word {
        Word { sign, ..self }
    }

    /// Extract the partial word `(l:r)`, right-aligned into a fresh word
    /// with zero-fill on the left, per spec.md §3.
    pub fn slice(self, l: u8, r: u8) -> Result<Word, WordError> {
        let spec = FieldSpec::new(l, r)?;
        Ok(self.slice_spec(spec))
    }

    pub fn slice_spec(self, spec: FieldSpec) -> Word {
        let sign = if spec.includes_sign() {
            self.sign
        } else {
            Sign::Plus
        };

        let count = spec.byte_count() as usize;
        let mut bytes = [0u8; 5];
        if count > 0 {
            let start = (spec.l.max(1) - 1) as usize;
            bytes[5 - count..].copy_from_slice(&self.bytes[start..start + count]);
        }

        Word { sign, bytes }
    }

    /// Store the partial word `(l:r)` of `src` into `self`, per spec.md §3.
    /// All other positions of `self` are preserved.
    pub fn store_slice(&mut self, l: u8, r: u8, src: Word) -> Result<(), WordError> {
        let spec = FieldSpec::new(l, r)?;
        self.store_slice_spec(spec, src);
        Ok(())
    }

    pub fn store_slice_spec(&mut self, spec: FieldSpec, src: Word) {
        if spec.includes_sign() {
            self.sign = src.sign;
        }

        let count = spec.byte_count() as usize;
        if count > 0 {
            let start = (spec.l.max(1) - 1) as usize;
            self.bytes[start..start + count].copy_from_slice(&src.bytes[5 - count..]);
        }
    }

    /// Build a word from up to five characters via the MIX character
    /// table (spec.md §4.1), right-padded with spaces. The result is
    /// always positive. Fails with [`WordError::Alf`] for longer input.
    pub fn from_alf(s: &str) -> Result<Word, WordError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() > 5 {
            return Err(WordError::Alf { len: chars.len() });
        }

        let mut bytes = [encode_char(' '); 5];
        for (i, &c) in chars.iter().enumerate() {
            bytes[i] = encode_char(c);
        }

        Ok(Word {
            sign: Sign::Plus,
            bytes,
        })
    }

    /// Render this word's five bytes through the MIX character table.
    pub fn to_alf_string(self) -> String {
        self.bytes.iter().map(|&b| decode_char(b)).collect()
    }
}

impl Default for Word {
    fn default() -> Word {
        Word::ZERO
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.sign)?;
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Word, MAX};
    use crate::sign::Sign;

    #[test]
    fn round_trip_nonzero_integers() {
        for n in &[1i64, -1, 42, -42, MAX, -MAX, 1_000_000, -1_000_000] {
            let word = Word::from_int(*n).unwrap();
            assert_eq!(word.to_int(), *n);
        }
    }

    #[test]
    fn zero_is_always_positive() {
        let word = Word::from_int(0).unwrap();
        assert_eq!(word.sign(), Sign::Plus);
        assert_eq!(word.to_int(), 0);
    }

    #[test]
    fn overflow_is_rejected() {
        assert!(Word::from_int(MAX + 1).is_err());
        assert!(Word::from_int(-(MAX + 1)).is_err());
    }

    #[test]
    fn positive_and_negative_zero_are_distinct_values_but_equal_integers() {
        let plus_zero = Word::from_int(0).unwrap();
        let minus_zero = Word::new(Sign::Minus, [0; 5]).unwrap();

        assert_ne!(plus_zero, minus_zero);
        assert_eq!(plus_zero.to_int(), minus_zero.to_int());
    }

    #[test]
    fn slice_whole_word_is_identity() {
        let word = Word::from_int(-123_456).unwrap();
        assert_eq!(word.slice(0, 5).unwrap(), word);
    }

    #[test]
    fn slice_excluding_sign_is_always_positive() {
        let word = Word::from_int(-123_456).unwrap();
        assert_eq!(word.slice(1, 5).unwrap().sign(), Sign::Plus);
    }

    #[test]
    fn slice_is_right_aligned() {
        // TAOCP 1.3.1 example: (1:1) of [10, 20, 30, 40, 50] is byte-5 = 10.
        let word = Word::new(Sign::Plus, [10, 20, 30, 40, 50]).unwrap();
        let extracted = word.slice(1, 1).unwrap();
        assert_eq!(extracted.bytes(), [0, 0, 0, 0, 10]);
    }

    #[test]
    fn sign_only_slice_has_zero_bytes() {
        let word = Word::new(Sign::Minus, [1, 2, 3, 4, 5]).unwrap();
        let extracted = word.slice(0, 0).unwrap();
        assert_eq!(extracted.sign(), Sign::Minus);
        assert_eq!(extracted.bytes(), [0; 5]);
    }

    #[test]
    fn store_whole_word_overwrites_everything() {
        let mut dest = Word::new(Sign::Plus, [9, 9, 9, 9, 9]).unwrap();
        let src = Word::new(Sign::Minus, [1, 2, 3, 4, 5]).unwrap();
        dest.store_slice(0, 5, src).unwrap();
        assert_eq!(dest, src);
    }

    #[test]
    fn store_preserves_untouched_positions() {
        let mut dest = Word::new(Sign::Plus, [1, 2, 3, 4, 5]).unwrap();
        let src = Word::new(Sign::Minus, [0, 0, 0, 0, 99]).unwrap();
        // (4:4): overwrite only byte 4 with the rightmost byte of src.
        dest.store_slice(4, 4, src).unwrap();
        assert_eq!(dest.sign(), Sign::Plus);
        assert_eq!(dest.bytes(), [1, 2, 3, 99, 5]);
    }

    #[test]
    fn field_spec_validation_rejects_bad_ranges() {
        assert!(Word::ZERO.slice(3, 1).is_err());
        assert!(Word::ZERO.slice(0, 6).is_err());
    }

    #[test]
    fn alf_round_trips_through_character_table() {
        let word = Word::from_alf("ABC").unwrap();
        assert_eq!(word.to_alf_string(), "ABC  ");
    }

    #[test]
    fn alf_rejects_long_input() {
        assert!(Word::from_alf("TOOLONG").is_err());
    }
}
