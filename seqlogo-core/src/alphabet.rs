//! Alphabets: canonical letters, ambiguity codes and gap symbols.

use std::fmt::{self, Debug, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{AlphabetError, InvalidSymbol};

/// Symbols treated as gaps by every alphabet, space included.
pub const GAP_SYMBOLS: &[u8] = b"-.~ ";

const NUCLEOTIDE_AMBIGUITY: &[u8] = b"NRYSWKMBDHVX";
const PROTEIN_AMBIGUITY: &[u8] = b"XBZJUO*";

/// The molecule type an alphabet was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetKind {
    Dna,
    Rna,
    Protein,
    Custom,
}

/// What an input symbol means in a given alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// A canonical letter, as its index in the alphabet.
    Letter(usize),
    /// An ambiguity code: counts toward depth, never toward a letter.
    Unknown,
    /// A gap.
    Gap,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Rejected,
    Letter(u8),
    Unknown,
    Gap,
}

/// An ordered set of canonical letters with its symbol resolution table.
///
/// Immutable once built; downstream stages share it behind an `Arc`.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    name: String,
    kind: AlphabetKind,
    letters: Vec<u8>,
    table: [Slot; 256],
}

impl Alphabet {
    fn build(
        name: &str,
        kind: AlphabetKind,
        letters: &[u8],
        unknown: &[u8],
    ) -> Result<Self, AlphabetError> {
        if letters.is_empty() {
            return Err(AlphabetError::Empty);
        }
        let mut table = [Slot::Rejected; 256];
        for &gap in GAP_SYMBOLS {
            table[gap as usize] = Slot::Gap;
        }
        for &u in unknown {
            table[u.to_ascii_uppercase() as usize] = Slot::Unknown;
            table[u.to_ascii_lowercase() as usize] = Slot::Unknown;
        }
        let mut canonical = Vec::with_capacity(letters.len());
        for (i, &l) in letters.iter().enumerate() {
            if !l.is_ascii_alphanumeric() {
                return Err(AlphabetError::InvalidLetter(l as char));
            }
            let upper = l.to_ascii_uppercase();
            if canonical.contains(&upper) {
                return Err(AlphabetError::Duplicate(l as char));
            }
            canonical.push(upper);
            table[upper as usize] = Slot::Letter(i as u8);
            table[upper.to_ascii_lowercase() as usize] = Slot::Letter(i as u8);
        }
        Ok(Self {
            name: name.to_string(),
            kind,
            letters: canonical,
            table,
        })
    }

    fn alias(mut self, from: u8, to: u8) -> Self {
        let slot = self.table[to as usize];
        self.table[from.to_ascii_uppercase() as usize] = slot;
        self.table[from.to_ascii_lowercase() as usize] = slot;
        self
    }

    /// Unambiguous DNA, `ACGT`. `U` is read as `T`.
    pub fn dna() -> Self {
        Self::build("dna", AlphabetKind::Dna, b"ACGT", NUCLEOTIDE_AMBIGUITY)
            .map(|a| a.alias(b'U', b'T'))
            .unwrap_or_else(|_| unreachable!("built-in alphabet is valid"))
    }

    /// Unambiguous RNA, `ACGU`. `T` is read as `U`.
    pub fn rna() -> Self {
        Self::build("rna", AlphabetKind::Rna, b"ACGU", NUCLEOTIDE_AMBIGUITY)
            .map(|a| a.alias(b'T', b'U'))
            .unwrap_or_else(|_| unreachable!("built-in alphabet is valid"))
    }

    /// The 20 standard amino acids.
    pub fn protein() -> Self {
        Self::build(
            "protein",
            AlphabetKind::Protein,
            b"ACDEFGHIKLMNPQRSTVWY",
            PROTEIN_AMBIGUITY,
        )
        .unwrap_or_else(|_| unreachable!("built-in alphabet is valid"))
    }

    /// A user-defined alphabet. Letters are case-insensitive and must be unique.
    pub fn custom(letters: &str) -> Result<Self, AlphabetError> {
        Self::build("custom", AlphabetKind::Custom, letters.as_bytes(), &[])
    }

    /// Look up a built-in alphabet by name.
    pub fn named(name: &str) -> Result<Self, AlphabetError> {
        match name.to_ascii_lowercase().as_str() {
            "dna" => Ok(Self::dna()),
            "rna" => Ok(Self::rna()),
            "protein" => Ok(Self::protein()),
            _ => Err(AlphabetError::UnknownName(name.to_string())),
        }
    }

    /// Register extra ambiguity codes, resolved as [`Resolution::Unknown`].
    ///
    /// Canonical letters keep their meaning.
    pub fn with_unknown(mut self, symbols: &str) -> Self {
        for b in symbols.bytes() {
            for s in [b.to_ascii_uppercase(), b.to_ascii_lowercase()] {
                if let Slot::Rejected | Slot::Gap = self.table[s as usize] {
                    self.table[s as usize] = Slot::Unknown;
                }
            }
        }
        self
    }

    /// Best-effort guess of the molecule type of some raw sequences.
    ///
    /// Each candidate is scored by how many symbols are one of its canonical
    /// letters; ties prefer DNA, then RNA, then protein.
    pub fn detect<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let candidates = [Self::dna(), Self::rna(), Self::protein()];
        let mut scores = [0usize; 3];
        for row in rows {
            for &b in row.as_ref() {
                let upper = b.to_ascii_uppercase();
                for (score, alphabet) in scores.iter_mut().zip(&candidates) {
                    if alphabet.letters.contains(&upper) {
                        *score += 1;
                    }
                }
            }
        }
        let mut best = 0;
        for i in 1..candidates.len() {
            if scores[i] > scores[best] {
                best = i;
            }
        }
        log::debug!("alphabet detection scores {:?}, picked {}", scores, candidates[best].name);
        candidates[best].clone()
    }

    /// Resolve a raw input symbol.
    #[inline]
    pub fn resolve(&self, symbol: u8) -> Result<Resolution, InvalidSymbol> {
        match self.table[symbol as usize] {
            Slot::Letter(i) => Ok(Resolution::Letter(i as usize)),
            Slot::Unknown => Ok(Resolution::Unknown),
            Slot::Gap => Ok(Resolution::Gap),
            Slot::Rejected => Err(InvalidSymbol(symbol as char)),
        }
    }

    /// The index of a canonical letter, if it is one.
    pub fn index_of(&self, letter: char) -> Option<usize> {
        if !letter.is_ascii() {
            return None;
        }
        let upper = (letter as u8).to_ascii_uppercase();
        self.letters.iter().position(|&l| l == upper)
    }

    /// The canonical letter at `index`.
    #[inline]
    pub fn letter(&self, index: usize) -> char {
        self.letters[index] as char
    }

    /// All canonical letters, in order.
    pub fn letters(&self) -> impl ExactSizeIterator<Item = char> + '_ {
        self.letters.iter().map(|&b| b as char)
    }

    /// Number of canonical letters, `K`.
    #[inline]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AlphabetKind {
        self.kind
    }

    /// The canonical letters as a string.
    pub fn as_str(&self) -> &str {
        // letters are checked to be ASCII on construction
        std::str::from_utf8(&self.letters).unwrap_or_default()
    }
}

impl Debug for Alphabet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("letters", &self.as_str())
            .finish()
    }
}

/// How the alphabet for a logo is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetSelection {
    /// Guess from the sequences with [`Alphabet::detect`].
    #[default]
    Auto,
    Dna,
    Rna,
    Protein,
    /// A user-defined set of letters.
    Custom(String),
}

impl AlphabetSelection {
    /// Build the selected alphabet, consulting `rows` only for `Auto`.
    pub fn resolve<I, S>(&self, rows: I) -> Result<Alphabet, AlphabetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        match self {
            Self::Auto => Ok(Alphabet::detect(rows)),
            Self::Dna => Ok(Alphabet::dna()),
            Self::Rna => Ok(Alphabet::rna()),
            Self::Protein => Ok(Alphabet::protein()),
            Self::Custom(letters) => Alphabet::custom(letters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_case_insensitive() {
        let dna = Alphabet::dna();
        assert_eq!(dna.resolve(b'A'), Ok(Resolution::Letter(0)));
        assert_eq!(dna.resolve(b'a'), Ok(Resolution::Letter(0)));
        assert_eq!(dna.resolve(b't'), Ok(Resolution::Letter(3)));
        assert_eq!(dna.resolve(b'u'), Ok(Resolution::Letter(3)));
    }

    #[test]
    fn test_ambiguity_and_gaps() {
        let dna = Alphabet::dna();
        assert_eq!(dna.resolve(b'N'), Ok(Resolution::Unknown));
        assert_eq!(dna.resolve(b'r'), Ok(Resolution::Unknown));
        assert_eq!(dna.resolve(b'-'), Ok(Resolution::Gap));
        assert_eq!(dna.resolve(b'.'), Ok(Resolution::Gap));

        let protein = Alphabet::protein();
        assert_eq!(protein.resolve(b'X'), Ok(Resolution::Unknown));
        assert_eq!(protein.resolve(b'*'), Ok(Resolution::Unknown));
        assert_eq!(protein.len(), 20);
    }

    #[test]
    fn test_rejects_foreign_symbols() {
        let dna = Alphabet::dna();
        assert_eq!(dna.resolve(b'E'), Err(InvalidSymbol('E')));
        assert_eq!(dna.resolve(b'1'), Err(InvalidSymbol('1')));
        assert!(Alphabet::protein().resolve(b'#').is_err());
    }

    #[test]
    fn test_custom_alphabet() {
        let abc = Alphabet::custom("ab01").unwrap();
        assert_eq!(abc.len(), 4);
        assert_eq!(abc.as_str(), "AB01");
        assert_eq!(abc.resolve(b'b'), Ok(Resolution::Letter(1)));
        assert_eq!(abc.resolve(b'N'), Err(InvalidSymbol('N')));
        let abc = abc.with_unknown("n");
        assert_eq!(abc.resolve(b'N'), Ok(Resolution::Unknown));
        assert_eq!(abc.resolve(b'A'), Ok(Resolution::Letter(0)));

        assert_eq!(Alphabet::custom(""), Err(AlphabetError::Empty));
        assert_eq!(Alphabet::custom("AbA"), Err(AlphabetError::Duplicate('A')));
        assert_eq!(Alphabet::custom("aB"), Ok(Alphabet::custom("AB").unwrap()));
        assert_eq!(Alphabet::custom("A-"), Err(AlphabetError::InvalidLetter('-')));
    }

    #[test]
    fn test_detect() {
        assert_eq!(Alphabet::detect(["ACGT", "AC-T"]).kind(), AlphabetKind::Dna);
        assert_eq!(Alphabet::detect(["ACGU", "UUGA"]).kind(), AlphabetKind::Rna);
        assert_eq!(Alphabet::detect(["MKVLW", "MKILW"]).kind(), AlphabetKind::Protein);
    }

    #[test]
    fn test_selection() {
        let rows: [&str; 0] = [];
        assert_eq!(
            AlphabetSelection::Protein.resolve(rows).unwrap().kind(),
            AlphabetKind::Protein
        );
        let sel = AlphabetSelection::Custom("XY".into());
        assert_eq!(sel.resolve(rows).unwrap().as_str(), "XY");
        assert!(Alphabet::named("klingon").is_err());
    }
}
