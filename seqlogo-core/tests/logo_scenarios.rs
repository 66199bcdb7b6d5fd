use seqlogo_core::information::{asymptotic_correction, exact_correction, small_sample_correction};
use seqlogo_core::{
    draw, layout, Alignment, Alphabet, ColorScheme, ColorSchemes, ConfigError, Correction,
    InformationModel, LogoOptions, Primitive, Units, CORRECTION_CROSSOVER,
};

fn model(rows: &[&str], units: Units) -> InformationModel {
    let alignment = Alignment::new(rows.iter(), Alphabet::dna()).expect("rectangular alignment");
    let counts = alignment.counts().expect("counts");
    InformationModel::new(&counts, units, Correction::SmallSample)
}

#[test]
fn uniform_column_has_no_information() {
    let m = model(&["AC", "CC", "GC", "TC"], Units::Bits);
    let uniform = m.record(0);
    assert!((uniform.entropy - 2.0).abs() < 1e-12);
    assert!((uniform.max_entropy - 2.0).abs() < 1e-12);
    assert_eq!(uniform.information, 0.0);
    assert!(uniform.heights.iter().all(|&h| h.abs() < 1e-12));
}

#[test]
fn conserved_column_is_one_segment() {
    let m = model(&["GA", "GC", "GG", "GT"], Units::Bits);
    let conserved = m.record(0);
    let expected = 2.0 - small_sample_correction(4.0, 4);
    assert_eq!(conserved.entropy, 0.0);
    assert!((conserved.information - expected).abs() < 1e-12);
    assert_eq!(conserved.heights[2], conserved.information);
    for (i, &h) in conserved.heights.iter().enumerate() {
        if i != 2 {
            assert_eq!(h, 0.0);
        }
    }

    let drawing = draw(
        &Alignment::new(["GA", "GC", "GG", "GT"], Alphabet::dna()).unwrap(),
        &LogoOptions::default(),
    )
    .unwrap();
    let glyphs: Vec<char> = drawing
        .glyphs()
        .map(|p| match p {
            Primitive::Glyph { symbol, .. } => *symbol,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(glyphs, vec!['G']);
}

#[test]
fn empty_columns_render_without_glyphs() {
    let alignment = Alignment::new(["A-", "C-", "G-", "T-"], Alphabet::dna()).unwrap();
    let drawing = draw(&alignment, &LogoOptions::default()).unwrap();
    assert_eq!(drawing.glyphs().count(), 0);
    assert!(drawing.canvas.width > 0.0 && drawing.canvas.height > 0.0);
}

#[test]
fn correction_agrees_at_crossover() {
    for k in [2, 4, 20, 21] {
        let exact = exact_correction(CORRECTION_CROSSOVER, k);
        let approx = asymptotic_correction(CORRECTION_CROSSOVER as f64, k);
        assert!((exact - approx).abs() < 1e-6, "K={}", k);
    }
}

#[test]
fn wrapping_23_columns_by_8() {
    let row = "ACGTACGTACGTACGTACGTACG";
    let m = model(&[row, row, row], Units::Bits);
    let options = LogoOptions {
        stacks_per_line: Some(8),
        first_index: 100,
        ..Default::default()
    };
    let g = layout(&m, &options, ColorSchemes::global()).unwrap();
    assert_eq!(g.line_lengths(), vec![8, 8, 7]);
    let firsts: Vec<i64> = g.lines.iter().map(|l| l.stacks[0].index).collect();
    assert_eq!(firsts, vec![100, 108, 116]);
    assert_eq!(g.lines[2].stacks.last().map(|s| s.index), Some(122));
}

#[test]
fn explicit_range_below_tallest_is_rejected() {
    let alignment = Alignment::new(["AAAA", "AAAC", "AAGG", "ATTT"], Alphabet::dna()).unwrap();
    let options = LogoOptions {
        yaxis_range: Some((0.0, 0.5)),
        ..Default::default()
    };
    let err = draw(&alignment, &options).unwrap_err();
    assert!(
        err.to_string().contains("column 1"),
        "unexpected message: {}",
        err
    );
    assert!(matches!(
        err,
        seqlogo_core::LogoError::Config(ConfigError::InvalidRange { .. })
    ));
}

#[test]
fn unmapped_letter_uses_default_color() {
    let scheme = ColorScheme::new("sparse", "", Vec::new());
    assert_eq!(scheme.color_of('Q', 12), scheme.default);
    let builtin = ColorSchemes::builtin();
    let charge = builtin.get("charge").unwrap();
    assert_eq!(charge.color_of('A', 0), charge.default);
}

#[test]
fn units_scale_the_whole_logo() {
    let rows = ["ACGT", "ACGA", "ACTT", "AGGT"];
    let bits = model(&rows, Units::Bits);
    let kt = model(&rows, Units::Kt);
    for (b, k) in bits.records().iter().zip(kt.records()) {
        assert!((Units::Kt.to_bits(k.total_height()) - b.total_height()).abs() < 1e-12);
    }
}
