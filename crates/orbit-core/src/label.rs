pub const WRAP_WIDTH: usize = 15;
pub const LINE_HEIGHT: f64 = 1.2; // em

/// (max label length, font size in points), checked in order.
const FONT_TIERS: &[(usize, f64)] = &[(16, 13.0), (22, 11.0)];
const SMALLEST_FONT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub lines: Vec<String>,
    pub font_size: f64,
}

impl LabelLayout {
    pub fn new(label: &str) -> Self {
        Self {
            lines: wrap(label, WRAP_WIDTH),
            font_size: font_size(label),
        }
    }
}

pub fn font_size(label: &str) -> f64 {
    let len = label.chars().count();
    FONT_TIERS
        .iter()
        .find(|(max, _)| len <= *max)
        .map_or(SMALLEST_FONT, |(_, size)| *size)
}

/// Greedy word wrap on single spaces. A word longer than `width` gets a line of its own and is
/// never split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        if current.chars().count() + word.chars().count() < width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_tiers() {
        assert_eq!(font_size("Engine"), 13.0);
        assert_eq!(font_size("sixteen chars ok"), 13.0);
        assert_eq!(font_size("seventeen chars!!"), 11.0);
        assert_eq!(font_size("exactly twenty-two ch."), 11.0);
        assert_eq!(font_size("twenty-three characters"), 10.0);
    }

    #[test]
    fn test_wrap_lines() {
        assert_eq!(wrap("Open trunk", 15), vec!["Open trunk"]);
        assert_eq!(
            wrap("Toggle the passenger window", 15),
            vec!["Toggle the", "passenger", "window"]
        );
        assert_eq!(wrap("exactly fifteen", 15), vec!["exactly fifteen"]);
        assert_eq!(
            wrap("Supercalifragilistic car", 15),
            vec!["Supercalifragilistic", "car"]
        );
    }

    #[test]
    fn test_wrap_empty_label() {
        assert_eq!(wrap("", 15), vec![""]);
    }

    #[test]
    fn test_layout() {
        let layout = LabelLayout::new("Put in vehicle trunk now");
        assert_eq!(layout.lines, vec!["Put in vehicle", "trunk now"]);
        assert_eq!(layout.font_size, 10.0);
    }
}
