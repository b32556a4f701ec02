// Open Bible Stories markdown: each frame is an image line followed by its text

use tracing::debug;

use super::normalization::normalize_text;

const IMAGE_MARKER: &str = "[OBS Image]";

/// Extract the text of one story frame; frame 0 is the story title
pub fn extract_frame(markdown: &str, story: u32, frame: u32) -> Option<String> {
    let position_marker = format!("-{story:02}-{frame:02}.");
    let mut collecting = frame == 0;
    let mut found = frame == 0;
    let mut lines = Vec::new();

    for line in markdown.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let is_image_line = line.contains(IMAGE_MARKER) || line.starts_with("![");
        if !collecting {
            if is_image_line && line.contains(&position_marker) {
                collecting = true;
                found = true;
            }
            continue;
        }
        if is_image_line || is_reference_footer(line) {
            break;
        }
        lines.push(line.trim_start_matches('#').trim());
    }

    if !found {
        debug!("Frame {:02}-{:02} not found in story markdown", story, frame);
        return None;
    }
    let text = normalize_text(&strip_emphasis(&lines.join(" ")));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// `_A Bible story from: Genesis 1-2_` closes the last frame
fn is_reference_footer(line: &str) -> bool {
    line.len() > 1 && line.starts_with('_') && line.ends_with('_')
}

fn strip_emphasis(text: &str) -> String {
    text.chars().filter(|ch| !matches!(ch, '*' | '_')).collect()
}
