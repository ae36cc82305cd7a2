/// A bounded slice of the input text, tagged with its position so results can
/// be reassembled in the original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub index: usize,
}

/// Split `text` into word-aligned segments of at most `max_len` characters.
///
/// Words are accumulated greedily while the joined length (single spaces
/// between words) stays within `max_len`; an overflowing word closes the
/// current segment and starts the next one. Words are never split, so a
/// single word longer than `max_len` becomes its own oversized segment.
/// Empty or whitespace-only input yields no segments.
#[must_use]
pub fn segment(text: &str, max_len: usize) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        // +1 accounts for the joining space
        let word_len = word.len() + 1;

        if current_len + word_len > max_len && !current.is_empty() {
            segments.push(Segment {
                text: current.join(" "),
                index: segments.len(),
            });
            current.clear();
            current_len = 0;
        }

        current.push(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        segments.push(Segment {
            text: current.join(" "),
            index: segments.len(),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_yields_no_segments() {
        assert!(segment("", 350).is_empty());
        assert!(segment("   \n\t  ", 350).is_empty());
    }

    #[test]
    fn test_short_input_is_a_single_segment() {
        let segments = segment("Hello world", 350);
        assert_eq!(
            segments,
            vec![Segment {
                text: "Hello world".to_string(),
                index: 0,
            }]
        );
    }

    #[test]
    fn test_splits_on_word_boundaries() {
        let segments = segment("one two three four", 9);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_indexes_are_sequential() {
        let segments = segment("a b c d e f g h", 3);
        for (position, seg) in segments.iter().enumerate() {
            assert_eq!(seg.index, position);
        }
    }

    #[test]
    fn test_oversized_word_becomes_its_own_segment() {
        let long_word = "x".repeat(40);
        let input = format!("short {long_word} tail");
        let segments = segment(&input, 10);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["short", long_word.as_str(), "tail"]);
    }

    #[test]
    fn test_segments_respect_max_len() {
        let input = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        for seg in segment(input, 20) {
            assert!(seg.text.len() <= 20, "segment too long: {:?}", seg.text);
        }
    }

    #[test]
    fn test_joined_words_reproduce_normalized_input() {
        let input = "  The   quick\nbrown fox \t jumps over the lazy dog  ";
        let segments = segment(input, 12);
        let rejoined = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let normalized = input.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, normalized);
    }
}
