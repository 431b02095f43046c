use docbridge::application::ports::WordBox;
use docbridge::infrastructure::text_processing::{BorderlessTableDetector, text_lines_to_words};

fn word(text: &str, left: f32, line: u32, confidence: f32) -> WordBox {
    WordBox {
        text: text.to_string(),
        left,
        top: line as f32 * 30.0,
        width: 10.0 * text.len() as f32,
        height: 20.0,
        confidence,
        line: (1, 1, line),
    }
}

fn rows(table: &[Vec<String>]) -> Vec<Vec<&str>> {
    table
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect()
}

#[test]
fn given_aligned_text_lines_when_detecting_then_splits_on_wide_gaps() {
    let text = "Quarterly results\nName     Q1     Q2\nAlice    100    120\nBob Lee  200    210\n\nThanks";

    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words(text));

    assert_eq!(tables.len(), 1);
    assert_eq!(
        rows(&tables[0]),
        vec![
            vec!["Name", "Q1", "Q2"],
            vec!["Alice", "100", "120"],
            vec!["Bob Lee", "200", "210"],
        ]
    );
}

#[test]
fn given_right_aligned_numbers_when_detecting_then_assigns_nearest_column() {
    let text = "Item   Count\nPens      12\nPaper    1200";

    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words(text));

    assert_eq!(
        rows(&tables[0]),
        vec![
            vec!["Item", "Count"],
            vec!["Pens", "12"],
            vec!["Paper", "1200"],
        ]
    );
}

#[test]
fn given_tab_separated_line_when_converting_then_tab_separates_cells() {
    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words("a\tb\n1\t2"));

    assert_eq!(rows(&tables[0]), vec![vec!["a", "b"], vec!["1", "2"]]);
}

#[test]
fn given_prose_only_when_detecting_then_finds_nothing() {
    let text = "This is a paragraph of ordinary prose.\nIt wraps onto a second line.";

    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words(text));

    assert!(tables.is_empty());
}

#[test]
fn given_single_multi_cell_line_when_detecting_then_needs_two_rows() {
    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words("A    B"));

    assert!(tables.is_empty());
}

#[test]
fn given_low_confidence_words_when_detecting_then_ignores_them() {
    let words = vec![
        word("Name", 0.0, 1, 95.0),
        word("Score", 200.0, 1, 95.0),
        word("Ann", 0.0, 2, 95.0),
        word("9", 200.0, 2, 95.0),
        word("smudge", 400.0, 2, 12.0),
    ];

    let tables = BorderlessTableDetector::default().detect(&words);

    assert_eq!(rows(&tables[0]), vec![vec!["Name", "Score"], vec!["Ann", "9"]]);
}

#[test]
fn given_row_with_missing_cell_when_implicit_rows_then_pads_it() {
    let words = vec![
        word("A", 0.0, 1, 90.0),
        word("B", 200.0, 1, 90.0),
        word("C", 400.0, 1, 90.0),
        word("1", 0.0, 2, 90.0),
        word("3", 400.0, 2, 90.0),
        word("4", 0.0, 3, 90.0),
        word("5", 200.0, 3, 90.0),
        word("6", 400.0, 3, 90.0),
    ];

    let implicit = BorderlessTableDetector::new(50.0, true).detect(&words);
    let strict = BorderlessTableDetector::new(50.0, false).detect(&words);

    assert_eq!(
        rows(&implicit[0]),
        vec![vec!["A", "B", "C"], vec!["1", "", "3"], vec!["4", "5", "6"]]
    );
    assert_eq!(
        rows(&strict[0]),
        vec![vec!["A", "B", "C"], vec!["4", "5", "6"]]
    );
}

#[test]
fn given_text_when_converting_then_uses_character_units() {
    let words = text_lines_to_words("ab  cd\nx");

    assert_eq!(words.len(), 3);
    assert_eq!((words[0].left, words[0].width), (0.0, 2.0));
    assert_eq!((words[1].left, words[1].width), (4.0, 2.0));
    assert_eq!(words[2].line, (0, 0, 1));
    assert!(words.iter().all(|w| w.height == 1.0));
}

#[test]
fn given_double_spaced_sentences_when_detecting_then_finds_nothing() {
    let text = "The results were strong.  Revenue grew in every region.\nMargins held steady.  Costs fell slightly overall.\n";

    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words(text));

    assert!(tables.is_empty());
}

#[test]
fn given_long_running_text_cells_when_detecting_then_finds_nothing() {
    let text = "one two three four five six seven eight nine  ten\nalpha beta gamma delta epsilon zeta eta theta iota  kappa";

    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words(text));

    assert!(tables.is_empty());
}

#[test]
fn given_cells_off_both_column_edges_when_detecting_then_finds_nothing() {
    let text = "Alpha  Bravissimo\nGamma     Dot";

    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words(text));

    assert!(tables.is_empty());
}

#[test]
fn given_abbreviations_in_cells_when_detecting_then_keeps_table() {
    let text = "Company      Units\nAcme Inc.       10\nBeta Co.         7";

    let tables = BorderlessTableDetector::default().detect(&text_lines_to_words(text));

    assert_eq!(
        rows(&tables[0]),
        vec![
            vec!["Company", "Units"],
            vec!["Acme Inc.", "10"],
            vec!["Beta Co.", "7"],
        ]
    );
}
