use crate::application::ports::WordBox;
use crate::domain::RawTable;

pub const DEFAULT_MIN_CONFIDENCE: f32 = 50.0;
pub const DEFAULT_COLUMN_GAP: f32 = 1.5;

/// Cells longer than this read as running text rather than table data.
const MAX_CELL_WORDS: usize = 8;

/// Finds ruled-less tables in positioned words by looking for runs of lines
/// that split into several horizontally separated cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderlessTableDetector {
    /// Words below this confidence (0-100) are ignored.
    pub min_confidence: f32,
    /// Keep lines with fewer cells than the widest line, padding the gaps.
    pub implicit_rows: bool,
    pub min_rows: usize,
    pub min_cols: usize,
    /// Horizontal gap, in multiples of the median word height, that
    /// separates two cells.
    pub column_gap: f32,
}

impl Default for BorderlessTableDetector {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            implicit_rows: true,
            min_rows: 2,
            min_cols: 2,
            column_gap: DEFAULT_COLUMN_GAP,
        }
    }
}

#[derive(Debug, Clone)]
struct Cell {
    left: f32,
    right: f32,
    text: String,
}

impl Cell {
    /// A sentence (several words closed by `.`, `!` or `?`) or a long run of
    /// words.
    fn reads_as_prose(&self) -> bool {
        let words = self.text.split_whitespace().count();
        let sentence = words >= 3 && self.text.ends_with(['.', '!', '?']);
        sentence || words > MAX_CELL_WORDS
    }
}

impl BorderlessTableDetector {
    pub fn new(min_confidence: f32, implicit_rows: bool) -> Self {
        Self {
            min_confidence,
            implicit_rows,
            ..Self::default()
        }
    }

    /// Returns every detected table in reading order. The first row of each
    /// table is its header.
    pub fn detect(&self, words: &[WordBox]) -> Vec<RawTable> {
        let kept: Vec<&WordBox> = words
            .iter()
            .filter(|w| w.confidence >= self.min_confidence && !w.text.trim().is_empty())
            .collect();

        let Some(height) = median_height(&kept) else {
            return Vec::new();
        };
        let gap = self.column_gap * height;

        let lines: Vec<Vec<Cell>> = group_lines(&kept)
            .into_iter()
            .map(|line| split_cells(line, gap))
            .collect();

        let mut tables = Vec::new();
        let mut run: Vec<&Vec<Cell>> = Vec::new();

        for line in &lines {
            if line.len() >= self.min_cols && !line.iter().any(Cell::reads_as_prose) {
                run.push(line);
                continue;
            }
            if let Some(table) = self.build_table(&run, gap) {
                tables.push(table);
            }
            run.clear();
        }
        if let Some(table) = self.build_table(&run, gap) {
            tables.push(table);
        }

        tables
    }

    fn build_table(&self, run: &[&Vec<Cell>], tolerance: f32) -> Option<RawTable> {
        if run.len() < self.min_rows {
            return None;
        }

        // Each anchor is the leftmost start of that column among the widest lines.
        let columns = run.iter().map(|line| line.len()).max()?;
        let widest: Vec<&Vec<Cell>> = run
            .iter()
            .copied()
            .filter(|line| line.len() == columns)
            .collect();
        let anchors: Vec<f32> = (0..columns)
            .map(|index| {
                widest
                    .iter()
                    .map(|line| line[index].left)
                    .fold(f32::INFINITY, f32::min)
            })
            .collect();
        let right_edges: Vec<f32> = (0..columns)
            .map(|index| {
                widest
                    .iter()
                    .map(|line| line[index].right)
                    .fold(f32::NEG_INFINITY, f32::max)
            })
            .collect();

        // Every full row must start or end each cell on its column's edge.
        let aligned = widest.iter().all(|line| {
            line.iter().enumerate().all(|(index, cell)| {
                (cell.left - anchors[index]).abs() <= tolerance
                    || (cell.right - right_edges[index]).abs() <= tolerance
            })
        });
        if !aligned {
            return None;
        }

        let rows: RawTable = run
            .iter()
            .filter(|line| self.implicit_rows || line.len() == anchors.len())
            .map(|line| align(line, &anchors, tolerance))
            .collect();

        (rows.len() >= self.min_rows).then_some(rows)
    }
}

/// Converts plain text lines into word boxes: one unit per character, unit
/// height, one line key per text line. Tabs count as two units of space.
pub fn text_lines_to_words(text: &str) -> Vec<WordBox> {
    let mut words = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let mut column = 0usize;
        let mut current: Option<(usize, String)> = None;

        for ch in line.chars() {
            if ch.is_whitespace() {
                if let Some((start, word)) = current.take() {
                    words.push(unit_box(word, start, line_index));
                }
                column += if ch == '\t' { 2 } else { 1 };
            } else {
                current.get_or_insert_with(|| (column, String::new())).1.push(ch);
                column += 1;
            }
        }

        if let Some((start, word)) = current {
            words.push(unit_box(word, start, line_index));
        }
    }

    words
}

fn unit_box(text: String, start: usize, line_index: usize) -> WordBox {
    let width = text.chars().count() as f32;
    WordBox {
        text,
        left: start as f32,
        top: line_index as f32,
        width,
        height: 1.0,
        confidence: 100.0,
        line: (0, 0, line_index as u32),
    }
}

fn median_height(words: &[&WordBox]) -> Option<f32> {
    let mut heights: Vec<f32> = words.iter().map(|w| w.height).filter(|h| *h > 0.0).collect();
    if heights.is_empty() {
        return None;
    }
    heights.sort_by(f32::total_cmp);
    Some(heights[heights.len() / 2])
}

/// Groups words by line key, keeping lines in order of first appearance and
/// words left to right.
fn group_lines<'a>(words: &[&'a WordBox]) -> Vec<Vec<&'a WordBox>> {
    let mut keys: Vec<(u32, u32, u32)> = Vec::new();
    let mut lines: Vec<Vec<&WordBox>> = Vec::new();

    for &word in words {
        match keys.iter().position(|k| *k == word.line) {
            Some(index) => lines[index].push(word),
            None => {
                keys.push(word.line);
                lines.push(vec![word]);
            }
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.left.total_cmp(&b.left));
    }

    lines
}

fn split_cells(line: Vec<&WordBox>, gap: f32) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();

    for word in line {
        match cells.last_mut() {
            Some(cell) if word.left - cell.right <= gap => {
                cell.text.push(' ');
                cell.text.push_str(&word.text);
                cell.right = cell.right.max(word.right());
            }
            _ => cells.push(Cell {
                left: word.left,
                right: word.right(),
                text: word.text.clone(),
            }),
        }
    }

    cells
}

/// Places each cell under the last anchor starting at or before it (within
/// `tolerance`); cells landing on the same anchor are joined.
fn align(line: &[Cell], anchors: &[f32], tolerance: f32) -> Vec<String> {
    let mut row = vec![String::new(); anchors.len()];

    for cell in line {
        let index = anchors
            .iter()
            .rposition(|anchor| *anchor <= cell.left + tolerance)
            .unwrap_or(0);

        let slot = &mut row[index];
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(&cell.text);
    }

    row
}
