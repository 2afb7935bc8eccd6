//! Line classification: rebuild heading depth and image captions.
//!
//! The converter flattens every heading to level 1, keeping the real depth
//! only as a dotted number in the title (`#2.3 Deployment`), and it emits
//! figures as bare `![](images/<hash>.jpg)` lines with the caption, if any,
//! on the following line. One forward pass over the lines repairs both:
//!
//! | Line | Action |
//! |------|--------|
//! | `![](images/<hex>.jpg)`, next line has text | next line becomes the caption and is dropped |
//! | `![](images/<hex>.jpg)`, next line blank or absent | nearest heading above becomes the caption; blank line dropped |
//! | `![](images/<hex>.jpg)`, next line starts with `!`/`#` | unchanged |
//! | `#<n>.<m> …` | promoted to `##` |
//! | `#<n>.<m>.<k> …` | promoted to `###` |
//! | anything else | unchanged |
//!
//! Using the nearest heading as a caption is a best-effort guess, not a
//! guarantee that the heading describes the figure.

use once_cell::sync::Lazy;
use regex::Regex;

/// A bare converter image line. Group 1 is the link target.
static RE_BARE_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\[\]\((images/[a-f0-9]+\.jpg)\)\s*$").unwrap());

static RE_NUMBERED_2: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\d+\.\d+\s").unwrap());

static RE_NUMBERED_3: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\d+\.\d+\.\d+\s").unwrap());

/// Dotted section number at the start of a heading title (`3.1 `, `2.3.1 `).
static RE_SECTION_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)+\s+").unwrap());

/// Rewrite converter Markdown: promote numbered headings and caption bare images.
///
/// Total and deterministic. Lines are split on `\n` and re-joined with `\n`,
/// so a trailing newline (or its absence) survives unchanged.
///
/// ```rust
/// use edgequake_md_restructure::restructure_markdown;
///
/// let out = restructure_markdown("#2.3 Deployment Model\n![](images/ab12.jpg)\nFigure 1\n");
/// assert_eq!(out, "##2.3 Deployment Model\n![Figure 1](images/ab12.jpg)\n");
/// ```
pub fn restructure_markdown(content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(caps) = RE_BARE_IMAGE.captures(line) {
            let target = &caps[1];
            let next = lines.get(i + 1).map(|l| l.trim()).unwrap_or("");

            if next.is_empty() {
                match nearest_heading_caption(&lines[..i]) {
                    Some(caption) => {
                        out.push(format!("![{caption}]({target})"));
                        if i + 1 < lines.len() {
                            // The blank line after the figure goes with it.
                            i += 1;
                        }
                    }
                    None => out.push(line.to_string()),
                }
            } else if !next.starts_with('!') && !next.starts_with('#') {
                out.push(format!("![{next}]({target})"));
                i += 1;
            } else {
                out.push(line.to_string());
            }
            i += 1;
            continue;
        }

        if line.starts_with('#') {
            out.push(promote_heading(line));
        } else {
            out.push(line.to_string());
        }
        i += 1;
    }

    out.join("\n")
}

/// Restore the depth a numbered heading lost. Other lines pass through.
///
/// The two-level rule is checked first; it cannot match a three-level
/// heading because the character after the second number group is `.`,
/// not whitespace.
pub fn promote_heading(line: &str) -> String {
    if RE_NUMBERED_2.is_match(line) {
        format!("#{line}")
    } else if RE_NUMBERED_3.is_match(line) {
        format!("##{line}")
    } else {
        line.to_string()
    }
}

/// Caption taken from the closest heading above, scanning upward.
fn nearest_heading_caption(preceding: &[&str]) -> Option<String> {
    preceding
        .iter()
        .rev()
        .find_map(|l| heading_title(l).map(heading_caption))
}

/// Trimmed title of a heading line, if the line is a heading with any text.
fn heading_title(line: &str) -> Option<&str> {
    if !line.starts_with('#') {
        return None;
    }
    let title = line.trim_start_matches('#').trim();
    (!title.is_empty()).then_some(title)
}

/// A heading title minus its section number; the number alone is kept as-is.
fn heading_caption(title: &str) -> String {
    let stripped = RE_SECTION_NUMBER.replace(title, "");
    if stripped.trim().is_empty() {
        title.to_string()
    } else {
        stripped.into_owned()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const IMG: &str = "![](images/3f9a0c.jpg)";

    #[test]
    fn two_level_heading_promoted() {
        assert_eq!(
            restructure_markdown("#2.3 Deployment Model"),
            "##2.3 Deployment Model"
        );
    }

    #[test]
    fn three_level_heading_promoted() {
        assert_eq!(restructure_markdown("#2.3.1 Rollback"), "###2.3.1 Rollback");
    }

    #[test]
    fn unnumbered_and_nested_headings_unchanged() {
        for line in ["#Overview", "# Overview", "##2.3 Already nested", "#2 Single number", "#2.3"] {
            assert_eq!(restructure_markdown(line), line, "line: {line}");
        }
    }

    #[test]
    fn four_level_number_is_not_promoted() {
        assert_eq!(restructure_markdown("#1.2.3.4 Deep"), "#1.2.3.4 Deep");
    }

    #[test]
    fn inline_caption_consumed() {
        let input = format!("intro\n{IMG}\nFigure: revenue by quarter\nafter");
        let out = restructure_markdown(&input);
        assert_eq!(
            out,
            "intro\n![Figure: revenue by quarter](images/3f9a0c.jpg)\nafter"
        );
        assert_eq!(out.lines().count(), input.lines().count() - 1);
    }

    #[test]
    fn inline_caption_is_trimmed() {
        let out = restructure_markdown(&format!("{IMG}\n   Figure 2  \n"));
        assert_eq!(out, "![Figure 2](images/3f9a0c.jpg)\n");
    }

    #[test]
    fn heading_caption_used_when_next_line_blank() {
        let input = format!("## 3.1 Setup\nsome text\n{IMG}\n\nnext paragraph");
        let out = restructure_markdown(&input);
        assert_eq!(
            out,
            "## 3.1 Setup\nsome text\n![Setup](images/3f9a0c.jpg)\nnext paragraph"
        );
    }

    #[test]
    fn nearest_heading_wins() {
        let input = format!("# Intro\n## Details\n{IMG}\n");
        assert!(restructure_markdown(&input).contains("![Details](images/3f9a0c.jpg)"));
    }

    #[test]
    fn heading_caption_when_image_is_last_line() {
        let input = format!("# Appendix\n{IMG}");
        assert_eq!(
            restructure_markdown(&input),
            "# Appendix\n![Appendix](images/3f9a0c.jpg)"
        );
    }

    #[test]
    fn no_heading_leaves_image_and_blank_line() {
        let input = format!("text\n{IMG}\n\nmore");
        assert_eq!(restructure_markdown(&input), input);
    }

    #[test]
    fn empty_heading_is_not_a_caption_source() {
        let input = format!("# Real\n#\n{IMG}\n");
        assert!(restructure_markdown(&input).contains("![Real](images/3f9a0c.jpg)"));
    }

    #[test]
    fn section_number_alone_is_kept() {
        let input = format!("## 4.2\n{IMG}\n");
        assert!(restructure_markdown(&input).contains("![4.2](images/3f9a0c.jpg)"));
    }

    #[test]
    fn next_line_image_or_heading_blocks_caption() {
        let input = format!("{IMG}\n![](images/bb.jpg)\nFigure B");
        assert_eq!(
            restructure_markdown(&input),
            "![](images/3f9a0c.jpg)\n![Figure B](images/bb.jpg)"
        );

        let input = format!("{IMG}\n#2.1 Next\n");
        assert_eq!(
            restructure_markdown(&input),
            "![](images/3f9a0c.jpg)\n##2.1 Next\n"
        );
    }

    #[test]
    fn consumed_caption_line_is_not_reclassified() {
        // The caption looks like nothing special; it must vanish, not be emitted twice.
        let input = format!("{IMG}\nplain caption\n#2.1 After");
        assert_eq!(
            restructure_markdown(&input),
            "![plain caption](images/3f9a0c.jpg)\n##2.1 After"
        );
    }

    #[test]
    fn only_bare_hex_jpg_images_match() {
        for line in [
            "![](images/3F9A.jpg)",
            "![](images/abc.png)",
            "![x](images/abc.jpg)",
            "see ![](images/abc.jpg)",
            "![](img/abc.jpg)",
        ] {
            let input = format!("# H\n{line}\n\n");
            assert_eq!(restructure_markdown(&input), input, "line: {line}");
        }
    }

    #[test]
    fn trailing_whitespace_after_image_tolerated() {
        let input = format!("{IMG}   \nCaption");
        assert_eq!(
            restructure_markdown(&input),
            "![Caption](images/3f9a0c.jpg)"
        );
    }

    #[test]
    fn idempotent_on_already_correct_input() {
        let input = "# Title\n\n## Section\n\nBody text.\n\n![Chart](images/ab.jpg)\n";
        let once = restructure_markdown(input);
        assert_eq!(once, input);
        assert_eq!(restructure_markdown(&once), once);
    }

    #[test]
    fn empty_input() {
        assert_eq!(restructure_markdown(""), "");
        assert_eq!(restructure_markdown("\n"), "\n");
    }
}
