/*!
# Information Model

Turns column counts into frequencies, Shannon entropy and small-sample
corrected information content, then into per-letter stack heights in the
selected unit.

For a column with `N` defined letters over an alphabet of `K` letters:

```text
H = -Σ f·log2(f)                 (0·log2 0 = 0)
R = max(0, log2(K) - H - e(N, K))
height(letter) = R · f(letter) · unit factor
```

`e(N, K)` is the expected entropy deficit of `N` uniform draws. It is
computed exactly below [`CORRECTION_CROSSOVER`] and from an asymptotic
series above it.

With a non-uniform background `q` (see [`Composition`]) the uniform
baseline is replaced by the relative entropy:

```text
R = max(0, Σ f·log2(f/q) - e(N, K))
```
*/

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::alignment::CountMatrix;
use crate::alphabet::Alphabet;
use crate::composition::Composition;
use crate::error::ConfigError;

/// Sample size at which the correction switches from the exact sum to the
/// asymptotic series.
pub const CORRECTION_CROSSOVER: usize = 1000;

// --- Small-sample correction -------------------------------------------------

/// Exact expected entropy deficit, in bits, of `n` draws from the uniform
/// distribution over `k` letters.
///
/// Every letter count is Binomial(n, 1/k), so the expected plug-in entropy is
/// `-k · Σ_m P(m) · (m/n) · log2(m/n)`. The pmf is walked in log space.
pub fn exact_correction(n: usize, k: usize) -> f64 {
    if n == 0 || k < 2 {
        return 0.0;
    }
    let p = 1.0 / k as f64;
    let ln_ratio = p.ln() - (-p).ln_1p();
    let nf = n as f64;

    let mut ln_pmf = nf * (-p).ln_1p();
    let mut sum = 0.0;
    for m in 0..=n {
        if m > 0 {
            let f = m as f64 / nf;
            sum += ln_pmf.exp() * f * f.log2();
        }
        if m < n {
            ln_pmf += ((nf - m as f64) / (m as f64 + 1.0)).ln() + ln_ratio;
        }
    }
    let expected = -(k as f64) * sum;
    ((k as f64).log2() - expected).max(0.0)
}

/// Asymptotic expansion of [`exact_correction`], in bits, for large `n`.
pub fn asymptotic_correction(n: f64, k: usize) -> f64 {
    if n <= 0.0 || k < 2 {
        return 0.0;
    }
    let k = k as f64;
    let nats = (k - 1.0) / (2.0 * n)
        + (k * k - 1.0) / (12.0 * n * n)
        + (k * k * k - k * k) / (12.0 * n * n * n);
    nats / std::f64::consts::LN_2
}

/// The small-sample correction `e(n, k)` in bits.
///
/// Uses the exact sum below [`CORRECTION_CROSSOVER`], the series above it.
/// Non-integer `n` (weighted counts) is rounded to the nearest integer, at
/// least one, for the exact sum.
pub fn small_sample_correction(n: f64, k: usize) -> f64 {
    if n <= 0.0 {
        0.0
    } else if n < CORRECTION_CROSSOVER as f64 {
        exact_correction(exact_sample_size(n), k)
    } else {
        asymptotic_correction(n, k)
    }
}

fn exact_sample_size(n: f64) -> usize {
    (n.round() as usize).max(1)
}

/// Memoised corrections for one alphabet size.
#[derive(Debug, Clone)]
struct CorrectionTable {
    k: usize,
    exact: HashMap<usize, f64>,
}

impl CorrectionTable {
    fn new(k: usize) -> Self {
        Self {
            k,
            exact: HashMap::new(),
        }
    }

    fn get(&mut self, n: f64) -> f64 {
        if n <= 0.0 {
            return 0.0;
        }
        if n < CORRECTION_CROSSOVER as f64 {
            let k = self.k;
            *self
                .exact
                .entry(exact_sample_size(n))
                .or_insert_with_key(|&m| exact_correction(m, k))
        } else {
            asymptotic_correction(n, self.k)
        }
    }
}

// --- Units -------------------------------------------------------------------

const LN_10: f64 = std::f64::consts::LN_10;
const LN_2: f64 = std::f64::consts::LN_2;
/// R·T at 298.15 K, in kJ/mol.
const KJ_PER_MOL: f64 = 8.314472 * 298.15 / 1000.0;
/// R·T at 298.15 K, in kcal/mol.
const KCAL_PER_MOL: f64 = 1.987 * 298.15 / 1000.0;

/// Units of the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    #[serde(rename = "bits")]
    Bits,
    #[serde(rename = "nats")]
    Nats,
    #[serde(rename = "digits")]
    Digits,
    #[serde(rename = "kT")]
    Kt,
    #[serde(rename = "kJ/mol")]
    KjPerMol,
    #[serde(rename = "kcal/mol")]
    KcalPerMol,
    /// Raw frequencies; bypasses the entropy computation.
    #[serde(rename = "probability")]
    Probability,
}

impl Units {
    pub const ALL: [Units; 7] = [
        Units::Bits,
        Units::Nats,
        Units::Digits,
        Units::Kt,
        Units::KjPerMol,
        Units::KcalPerMol,
        Units::Probability,
    ];

    /// Multiplicative factor from bits, or `None` for probability units.
    pub fn factor(self) -> Option<f64> {
        match self {
            Units::Bits => Some(1.0),
            Units::Nats | Units::Kt => Some(LN_2),
            Units::Digits => Some(LN_2 / LN_10),
            Units::KjPerMol => Some(LN_2 * KJ_PER_MOL),
            Units::KcalPerMol => Some(LN_2 * KCAL_PER_MOL),
            Units::Probability => None,
        }
    }

    /// Convert a value in bits to this unit. Probability values pass through.
    pub fn from_bits(self, bits: f64) -> f64 {
        self.factor().map(|f| bits * f).unwrap_or(bits)
    }

    /// Convert a value in this unit back to bits. Probability values pass through.
    pub fn to_bits(self, value: f64) -> f64 {
        self.factor().map(|f| value / f).unwrap_or(value)
    }

    /// The largest possible column height for an alphabet of `k` letters.
    pub fn max_height(self, k: usize) -> f64 {
        match self {
            Units::Probability => 1.0,
            _ => self.from_bits((k.max(1) as f64).log2()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Units::Bits => "bits",
            Units::Nats => "nats",
            Units::Digits => "digits",
            Units::Kt => "kT",
            Units::KjPerMol => "kJ/mol",
            Units::KcalPerMol => "kcal/mol",
            Units::Probability => "probability",
        }
    }
}

impl Display for Units {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Units {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::ALL
            .iter()
            .copied()
            .find(|u| u.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownUnits(s.to_string()))
    }
}

/// Whether to subtract the small-sample correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Correction {
    #[default]
    SmallSample,
    None,
}

/// Vertical order of the segments in a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackOrder {
    /// Ascending frequency from the bottom: the most frequent letter on top.
    #[default]
    LargestOnTop,
    /// Descending frequency from the bottom.
    LargestOnBottom,
}

// --- Records -----------------------------------------------------------------

/// One segment of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StackSegment {
    /// Index of the letter in the alphabet.
    pub letter: usize,
    pub frequency: f64,
    /// Height in the model's units.
    pub height: f64,
}

/// Information content of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InformationRecord {
    /// Defined-letter count, `N`.
    pub n: f64,
    /// Letters plus ambiguity codes.
    pub depth: f64,
    /// Shannon entropy in bits.
    pub entropy: f64,
    /// `log2(K)`.
    pub max_entropy: f64,
    /// Small-sample correction in bits (zero when disabled).
    pub correction: f64,
    /// Corrected information content `R` in bits, never negative, relative
    /// to the background when one is set.
    pub information: f64,
    /// Depth relative to the deepest column.
    pub weight: f64,
    pub frequencies: Vec<f64>,
    /// Per-letter heights in the model's units.
    pub heights: Vec<f64>,
    /// Raw letter counts.
    pub counts: Vec<f64>,
}

impl InformationRecord {
    fn compute(counts: &[f64], depth: f64, correction: f64, background: Option<&[f64]>) -> Self {
        let k = counts.len();
        let max_entropy = (k.max(1) as f64).log2();
        let n: f64 = counts.iter().sum();

        if n <= 0.0 {
            return Self {
                n: 0.0,
                depth,
                entropy: 0.0,
                max_entropy,
                correction: 0.0,
                information: 0.0,
                weight: 0.0,
                frequencies: vec![0.0; k],
                heights: vec![0.0; k],
                counts: counts.to_vec(),
            };
        }

        let frequencies: Vec<f64> = counts.iter().map(|c| c / n).collect();
        let entropy = -frequencies
            .iter()
            .filter(|&&f| f > 0.0)
            .map(|&f| f * f.log2())
            .sum::<f64>();
        // a conserved column sums to -0.0
        let entropy = if entropy > 0.0 { entropy } else { 0.0 };
        let baseline = match background {
            Some(q) => frequencies
                .iter()
                .zip(q)
                .filter(|(&f, _)| f > 0.0)
                .map(|(&f, &q)| f * (f / q).log2())
                .sum::<f64>(),
            None => max_entropy - entropy,
        };
        let information = (baseline - correction).max(0.0);

        Self {
            n,
            depth,
            entropy,
            max_entropy,
            correction,
            information,
            weight: 0.0,
            frequencies,
            heights: vec![0.0; k],
            counts: counts.to_vec(),
        }
    }

    fn set_units(&mut self, units: Units) {
        for (h, &f) in self.heights.iter_mut().zip(&self.frequencies) {
            *h = match units {
                Units::Probability => f,
                _ => units.from_bits(self.information * f),
            };
        }
    }

    /// Total stack height, in the model's units.
    pub fn total_height(&self) -> f64 {
        self.heights.iter().sum()
    }

    /// The non-empty segments of this column, bottom to top.
    ///
    /// Ties keep alphabet order: the earlier letter sits lower.
    pub fn stack(&self, order: StackOrder) -> Vec<StackSegment> {
        let mut segments: Vec<StackSegment> = self
            .heights
            .iter()
            .zip(&self.frequencies)
            .enumerate()
            .filter(|(_, (&h, _))| h > 0.0)
            .map(|(letter, (&height, &frequency))| StackSegment {
                letter,
                frequency,
                height,
            })
            .collect();
        match order {
            StackOrder::LargestOnTop => segments.sort_by(|a, b| a.frequency.total_cmp(&b.frequency)),
            StackOrder::LargestOnBottom => {
                segments.sort_by(|a, b| b.frequency.total_cmp(&a.frequency))
            }
        }
        segments
    }
}

// --- InformationModel --------------------------------------------------------

/// Per-column information records for a whole alignment.
#[derive(Debug, Clone)]
pub struct InformationModel {
    alphabet: Arc<Alphabet>,
    units: Units,
    correction: Correction,
    background: Option<Vec<f64>>,
    records: Vec<InformationRecord>,
}

impl InformationModel {
    /// A model against the uniform background.
    pub fn new(counts: &CountMatrix, units: Units, correction: Correction) -> Self {
        Self::build(counts, units, correction, None)
    }

    /// A model against an explicit background distribution, one entry per
    /// letter. The entries are normalised to sum to one.
    pub fn with_background(
        counts: &CountMatrix,
        units: Units,
        correction: Correction,
        background: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        let k = counts.alphabet().len();
        if background.len() != k {
            return Err(ConfigError::option(
                "composition",
                format!("{} background entries for {} letters", background.len(), k),
            ));
        }
        if background.iter().any(|&p| !(p.is_finite() && p > 0.0)) {
            return Err(ConfigError::option(
                "composition",
                "every background probability must be positive",
            ));
        }
        let total: f64 = background.iter().sum();
        let background = background.into_iter().map(|p| p / total).collect();
        Ok(Self::build(counts, units, correction, Some(background)))
    }

    /// A model against the background `composition` describes.
    pub fn with_composition(
        counts: &CountMatrix,
        units: Units,
        correction: Correction,
        composition: &Composition,
    ) -> Result<Self, ConfigError> {
        match composition.background(counts.alphabet())? {
            Some(q) => Self::with_background(counts, units, correction, q),
            None => Ok(Self::new(counts, units, correction)),
        }
    }

    fn build(
        counts: &CountMatrix,
        units: Units,
        correction: Correction,
        background: Option<Vec<f64>>,
    ) -> Self {
        let alphabet = counts.alphabet().clone();
        let mut table = CorrectionTable::new(alphabet.len());

        let mut records: Vec<InformationRecord> = counts
            .iter()
            .map(|column| {
                let e = match correction {
                    Correction::SmallSample => table.get(column.total()),
                    Correction::None => 0.0,
                };
                InformationRecord::compute(&column.letters, column.depth(), e, background.as_deref())
            })
            .collect();

        let max_depth = records.iter().map(|r| r.depth).fold(0.0, f64::max);
        for record in records.iter_mut() {
            record.weight = if max_depth > 0.0 {
                record.depth / max_depth
            } else {
                0.0
            };
            record.set_units(units);
        }

        log::debug!(
            "information model: {} columns, {} cached exact corrections, units {}",
            records.len(),
            table.exact.len(),
            units
        );

        Self {
            alphabet,
            units,
            correction,
            background,
            records,
        }
    }

    /// The same model expressed in different units.
    pub fn with_units(&self, units: Units) -> Self {
        let mut model = self.clone();
        model.units = units;
        for record in model.records.iter_mut() {
            record.set_units(units);
        }
        model
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn correction(&self) -> Correction {
        self.correction
    }

    /// The normalised background, `None` when uniform.
    pub fn background(&self) -> Option<&[f64]> {
        self.background.as_deref()
    }

    /// The largest possible column height in the model's units.
    pub fn max_height(&self) -> f64 {
        match (self.units, &self.background) {
            (Units::Probability, _) => 1.0,
            (units, Some(q)) => {
                let rarest = q.iter().copied().fold(f64::INFINITY, f64::min);
                units.from_bits(-rarest.log2())
            }
            (units, None) => units.max_height(self.alphabet.len()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, column: usize) -> &InformationRecord {
        &self.records[column]
    }

    pub fn records(&self) -> &[InformationRecord] {
        &self.records
    }

    /// The tallest column in `range`, as `(column, height)`.
    pub fn tallest(&self, range: std::ops::Range<usize>) -> Option<(usize, f64)> {
        self.records[range.clone()]
            .iter()
            .zip(range)
            .map(|(r, i)| (i, r.total_height()))
            .fold(None, |best, (i, h)| match best {
                Some((_, bh)) if bh >= h => best,
                _ => Some((i, h)),
            })
    }

    /// A tab-separated table of counts and information, numbered from `first_index`.
    pub fn table(&self, first_index: i64) -> InformationTable<'_> {
        InformationTable {
            model: self,
            first_index,
        }
    }
}

/// Per-column table of an [`InformationModel`]; entropy and information in bits.
#[derive(Debug, Clone, Copy)]
pub struct InformationTable<'a> {
    model: &'a InformationModel,
    first_index: i64,
}

impl Display for InformationTable<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "## LogoData")?;
        writeln!(f, "# Entropy and information are in bits.")?;
        writeln!(f, "# Weight is the depth of the column relative to the deepest one.")?;
        write!(f, "#")?;
        for letter in self.model.alphabet.letters() {
            write!(f, "\t{}", letter)?;
        }
        writeln!(f, "\tEntropy\tInformation\tWeight")?;
        for (i, record) in self.model.records.iter().enumerate() {
            write!(f, "{}", self.first_index + i as i64)?;
            for c in &record.counts {
                write!(f, "\t{}", c)?;
            }
            writeln!(
                f,
                "\t{:.4}\t{:.4}\t{:.4}",
                record.entropy, record.information, record.weight
            )?;
        }
        writeln!(f, "# End LogoData")
    }
}

impl Display for InformationModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.table(1).fmt(f)
    }
}

impl Display for InformationRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N={} H={:.4} e={:.4} R={:.4}",
            self.n, self.entropy, self.correction, self.information
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Alignment;

    fn model(rows: &[&str], units: Units, correction: Correction) -> InformationModel {
        let counts = Alignment::new(rows.iter(), Alphabet::dna())
            .unwrap()
            .counts()
            .unwrap();
        InformationModel::new(&counts, units, correction)
    }

    #[test]
    fn test_exact_correction_small_values() {
        // one observation carries no information at all
        assert!((exact_correction(1, 4) - 2.0).abs() < 1e-12);
        // two draws over two letters: H is 0 or 1 with equal odds
        assert!((exact_correction(2, 2) - 0.5).abs() < 1e-12);
        assert_eq!(exact_correction(0, 4), 0.0);
        assert_eq!(exact_correction(10, 1), 0.0);
    }

    #[test]
    fn test_correction_shrinks_with_n() {
        let mut last = f64::INFINITY;
        for n in [1usize, 2, 5, 10, 50, 200, 999] {
            let e = exact_correction(n, 4);
            assert!(e < last, "e({}) = {} not below {}", n, e, last);
            last = e;
        }
        assert!(asymptotic_correction(1e6, 4) < 1e-5);
    }

    #[test]
    fn test_crossover_agreement() {
        let n = CORRECTION_CROSSOVER;
        for k in 2..=21 {
            let exact = exact_correction(n, k);
            let approx = asymptotic_correction(n as f64, k);
            assert!(
                (exact - approx).abs() < 1e-6,
                "k={}: exact {} vs asymptotic {}",
                k,
                exact,
                approx
            );
        }
    }

    #[test]
    fn test_dispatch_uses_threshold() {
        let below = (CORRECTION_CROSSOVER - 1) as f64;
        assert_eq!(
            small_sample_correction(below, 4),
            exact_correction(CORRECTION_CROSSOVER - 1, 4)
        );
        let at = CORRECTION_CROSSOVER as f64;
        assert_eq!(small_sample_correction(at, 4), asymptotic_correction(at, 4));
        assert_eq!(small_sample_correction(0.0, 4), 0.0);
        assert_eq!(small_sample_correction(0.2, 4), exact_correction(1, 4));
    }

    #[test]
    fn test_units_round_trip() {
        for units in Units::ALL {
            let v = 1.234_567;
            assert!((units.to_bits(units.from_bits(v)) - v).abs() < 1e-12, "{}", units);
        }
        assert!((Units::Nats.from_bits(1.0) - LN_2).abs() < 1e-15);
        assert_eq!(Units::Bits.max_height(4), 2.0);
        assert_eq!(Units::Probability.max_height(20), 1.0);
    }

    #[test]
    fn test_units_parse() {
        assert_eq!("kcal/mol".parse::<Units>().unwrap(), Units::KcalPerMol);
        assert_eq!("BITS".parse::<Units>().unwrap(), Units::Bits);
        assert!("furlongs".parse::<Units>().is_err());
    }

    #[test]
    fn test_conserved_column() {
        let m = model(&["A", "A", "A", "A"], Units::Bits, Correction::SmallSample);
        let r = m.record(0);
        assert_eq!(r.entropy, 0.0);
        let expected = 2.0 - exact_correction(4, 4);
        assert!((r.information - expected).abs() < 1e-12);
        assert!((r.heights[0] - expected).abs() < 1e-12);
        assert_eq!(&r.heights[1..], &[0.0, 0.0, 0.0]);
        let stack = r.stack(StackOrder::LargestOnTop);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].letter, 0);
    }

    #[test]
    fn test_uniform_column_is_clamped() {
        let m = model(&["A", "C", "G", "T"], Units::Bits, Correction::SmallSample);
        let r = m.record(0);
        assert!((r.entropy - 2.0).abs() < 1e-12);
        assert_eq!(r.information, 0.0);
        assert!(r.heights.iter().all(|&h| h == 0.0));
        assert!(r.stack(StackOrder::LargestOnTop).is_empty());
    }

    #[test]
    fn test_gap_only_column() {
        let m = model(&["A-", "CN"], Units::Bits, Correction::SmallSample);
        let r = m.record(1);
        assert_eq!(r.n, 0.0);
        assert_eq!(r.depth, 1.0);
        assert!(r.heights.iter().all(|&h| h == 0.0));
        assert!(!r.information.is_nan());
        assert_eq!(m.with_units(Units::Probability).record(1).total_height(), 0.0);
    }

    #[test]
    fn test_probability_units() {
        let m = model(&["AC", "AC", "AG", "TG"], Units::Probability, Correction::SmallSample);
        for r in m.records() {
            assert!((r.total_height() - 1.0).abs() < 1e-12);
        }
        assert_eq!(m.record(0).heights, vec![0.75, 0.0, 0.0, 0.25]);
    }

    #[test]
    fn test_with_units_scales_heights() {
        let m = model(&["AAC", "AAC", "ACC"], Units::Bits, Correction::None);
        let nats = m.with_units(Units::Nats);
        for (b, n) in m.records().iter().zip(nats.records()) {
            assert!((b.total_height() * LN_2 - n.total_height()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stack_order_ties() {
        // A and T tie, C is largest
        let m = model(&["A", "C", "C", "C", "C", "T"], Units::Bits, Correction::None);
        let r = m.record(0);
        let up: Vec<usize> = r.stack(StackOrder::LargestOnTop).iter().map(|s| s.letter).collect();
        assert_eq!(up, vec![0, 3, 1]);
        let down: Vec<usize> = r.stack(StackOrder::LargestOnBottom).iter().map(|s| s.letter).collect();
        assert_eq!(down, vec![1, 0, 3]);
    }

    #[test]
    fn test_weight_and_tallest() {
        let m = model(&["AA-", "AC-", "AG-", "A-T"], Units::Bits, Correction::None);
        assert_eq!(m.record(0).weight, 1.0);
        assert_eq!(m.record(1).weight, 0.75);
        assert_eq!(m.record(2).weight, 0.25);
        assert_eq!(m.tallest(0..3).map(|(i, _)| i), Some(0));
        assert_eq!(m.tallest(1..3).map(|(i, _)| i), Some(2));
    }

    #[test]
    fn test_table() {
        let counts = Alignment::new(["AC", "AG"], Alphabet::dna())
            .unwrap()
            .counts()
            .unwrap();
        let m = InformationModel::new(&counts, Units::Bits, Correction::None);
        let table = m.table(-1).to_string();
        assert!(table.contains("#\tA\tC\tG\tT\tEntropy"));
        assert!(table.lines().any(|l| l.starts_with("-1\t2\t0\t0\t0\t0.0000\t2.0000")));
        assert!(table.lines().any(|l| l.starts_with("0\t0\t1\t1\t0\t1.0000\t1.0000")));
        assert!(m.to_string().lines().any(|l| l.starts_with("1\t2\t0")));
    }

    fn gc_model(rows: &[&str], percent: f64) -> InformationModel {
        let counts = Alignment::new(rows.iter(), Alphabet::dna())
            .unwrap()
            .counts()
            .unwrap();
        InformationModel::with_composition(
            &counts,
            Units::Bits,
            Correction::None,
            &Composition::GcPercent(percent),
        )
        .unwrap()
    }

    #[test]
    fn test_background_sets_baseline() {
        // 20% GC: A and T at 0.4, C and G at 0.1
        let m = gc_model(&["AG", "AG", "AG", "AG"], 20.0);
        assert!((m.record(0).information - 2.5f64.log2()).abs() < 1e-12);
        assert!((m.record(1).information - 10f64.log2()).abs() < 1e-12);
        assert!(m.record(1).information > 2.0);
        assert!((m.max_height() - 10f64.log2()).abs() < 1e-12);
        assert_eq!(m.background().map(|q| q.len()), Some(4));
    }

    #[test]
    fn test_column_matching_background_is_flat() {
        let rows = ["A", "A", "A", "A", "C", "G", "T", "T", "T", "T"];
        let m = gc_model(&rows, 20.0);
        assert!(m.record(0).information.abs() < 1e-12);
    }

    #[test]
    fn test_even_background_matches_uniform() {
        let rows = ["ACGT", "ACGA", "TCGA", "ACCA"];
        let even = gc_model(&rows, 50.0);
        let uniform = model(&rows, Units::Bits, Correction::None);
        for (a, b) in even.records().iter().zip(uniform.records()) {
            assert!((a.information - b.information).abs() < 1e-12);
        }
        assert!(uniform.background().is_none());
        assert_eq!(uniform.max_height(), 2.0);
    }

    #[test]
    fn test_background_is_validated() {
        let counts = Alignment::new(["AC"], Alphabet::dna()).unwrap().counts().unwrap();
        for q in [vec![1.0, 1.0, 1.0], vec![1.0, 0.0, 1.0, 1.0], vec![1.0, f64::NAN, 1.0, 1.0]] {
            assert!(InformationModel::with_background(&counts, Units::Bits, Correction::None, q)
                .is_err());
        }
        let m = InformationModel::with_background(
            &counts,
            Units::Bits,
            Correction::None,
            vec![2.0, 2.0, 2.0, 2.0],
        )
        .unwrap();
        assert_eq!(m.background(), Some(&[0.25, 0.25, 0.25, 0.25][..]));
    }
}
