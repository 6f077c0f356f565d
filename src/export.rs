//! Markdown and Word (`.doc`) export of generated artifacts.
//!
//! Payloads are read loosely: missing or mistyped fields are skipped, never an error.

mod doc;

pub use doc::{editor_cut_to_doc_html, escape_html, script_to_doc_html};

use serde_json::Value;
use std::fmt::Write;

/// Non-blank string field.
fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// String field, or a number rendered as text.
fn scalar(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn string_items<'a>(value: &'a Value, key: &str) -> Vec<&'a str> {
    array(value, key)
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

fn quote_block(out: &mut String, body: &str) {
    for line in body.lines() {
        let _ = writeln!(out, "> {}", line);
    }
    out.push('\n');
}

/// File name for an exported document: title reduced to ASCII alphanumerics and
/// spaces, whitespace runs replaced by `_`, then `_<suffix>.<extension>`.
pub fn export_filename(title: Option<&str>, suffix: &str, extension: &str) -> String {
    let cleaned: String = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("untitled")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    let base = if joined.is_empty() { "untitled" } else { joined.as_str() };
    format!("{}_{}.{}", base, suffix, extension)
}

/// Transcript-driven script as markdown.
pub fn script_to_markdown(script: &Value) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", text(script, "title").unwrap_or("Untitled"));
    if let Some(subtitle) = text(script, "subtitle") {
        let _ = writeln!(out, "*{}*\n", subtitle);
    }
    if let Some(duration) = text(script, "total_duration_estimate") {
        let _ = writeln!(out, "**Duration:** {}\n", duration);
    }
    if let Some(summary) = text(script, "story_summary") {
        let _ = writeln!(out, "{}\n", summary);
    }

    let characters = array(script, "characters");
    if !characters.is_empty() {
        out.push_str("## Cast\n\n");
        for character in characters {
            let name = text(character, "name").unwrap_or("Unknown");
            match text(character, "role") {
                Some(role) => {
                    let _ = writeln!(out, "- **{}**, {}", name, role);
                }
                None => {
                    let _ = writeln!(out, "- **{}**", name);
                }
            }
            if let Some(arc) = text(character, "arc") {
                let _ = writeln!(out, "  - *{}*", arc);
            }
        }
        out.push('\n');
    }

    for chapter in array(script, "chapters") {
        write_chapter(&mut out, chapter);
    }

    if let Some(music) = script.get("music_suggestions") {
        write_music_suggestions(&mut out, music);
    }

    if let Some(notes) = script.get("production_notes") {
        write_production_notes(&mut out, notes);
    }

    out
}

fn write_chapter(out: &mut String, chapter: &Value) {
    let title = text(chapter, "chapter_title").unwrap_or("Untitled chapter");
    match chapter.get("chapter_number").and_then(Value::as_i64) {
        Some(n) if n > 0 => {
            let _ = writeln!(out, "## Chapter {}: {}\n", n, title);
        }
        _ => {
            let _ = writeln!(out, "## {}\n", title);
        }
    }
    if let Some(duration) = text(chapter, "duration_estimate") {
        let _ = writeln!(out, "*~{}*\n", duration);
    }
    if let Some(purpose) = text(chapter, "purpose") {
        let _ = writeln!(out, "{}\n", purpose);
    }

    if let Some(music) = chapter.get("music_suggestion") {
        let parts: Vec<&str> = ["mood", "tempo", "instruments"]
            .iter()
            .filter_map(|key| text(music, key))
            .collect();
        if !parts.is_empty() {
            let _ = writeln!(out, "**[MUSIC]** {}\n", parts.join(" | "));
        }
        if let Some(reference) = text(music, "reference") {
            let _ = writeln!(out, "*Ref: {}*\n", reference);
        }
    }

    for beat in array(chapter, "beats") {
        let content = text(beat, "content").unwrap_or("");
        match beat.get("type").and_then(Value::as_str).unwrap_or("") {
            "scene_heading" => {
                let _ = writeln!(out, "**{}**\n", content.to_uppercase());
            }
            "direction" => {
                let _ = writeln!(out, "*[{}]*\n", content);
            }
            "dialogue" => {
                let speaker = text(beat, "speaker").unwrap_or("UNKNOWN");
                let _ = writeln!(out, "**{}:** \u{201c}{}\u{201d}\n", speaker, content);
            }
            "narration" => quote_block(out, &format!("*V.O.:* {}", content)),
            "tool_demo" => {
                let tool = text(beat, "tool_name").unwrap_or("Tool");
                let _ = writeln!(out, "`SCREEN RECORDING: {}`\n", tool.to_uppercase());
                if let Some(description) = text(beat, "description") {
                    let _ = writeln!(out, "*{}*\n", description);
                }
            }
            _ if !content.is_empty() => {
                let _ = writeln!(out, "{}\n", content);
            }
            _ => {}
        }
    }
    out.push_str("---\n\n");
}

fn write_music_suggestions(out: &mut String, music: &Value) {
    out.push_str("## Music & Soundtrack\n\n");
    if let Some(vision) = text(music, "overall_vision") {
        let _ = writeln!(out, "**Soundtrack vision:** {}\n", vision);
        if let Some(style) = text(music, "soundtrack_style") {
            let _ = writeln!(out, "Style: {}\n", style);
        }
    }
    let moments = array(music, "key_moments");
    if !moments.is_empty() {
        out.push_str("### Key Musical Moments\n\n");
        for moment in moments {
            let _ = writeln!(
                out,
                "- **{}**: {}",
                text(moment, "moment").unwrap_or(""),
                text(moment, "music").unwrap_or("")
            );
        }
        out.push('\n');
    }
    let genres = string_items(music, "recommended_genres");
    if !genres.is_empty() {
        let _ = writeln!(out, "Genres: {}\n", genres.join(", "));
    }
    let tracks = string_items(music, "reference_tracks");
    if !tracks.is_empty() {
        out.push_str("### Reference Tracks\n\n");
        for track in tracks {
            let _ = writeln!(out, "- {}", track);
        }
        out.push('\n');
    }
}

fn write_production_notes(out: &mut String, notes: &Value) {
    out.push_str("## Production Notes\n\n");
    if let Some(note) = text(notes, "editors_note") {
        out.push_str("### Editor's Note\n\n");
        quote_block(out, note);
    }
    if let Some(direction) = text(notes, "music_direction") {
        let _ = writeln!(out, "**Music Direction:** {}\n", direction);
    }
    if let Some(style) = text(notes, "visual_style") {
        let _ = writeln!(out, "**Visual Style:** {}\n", style);
    }
    let missing = string_items(notes, "missing_footage");
    if !missing.is_empty() {
        out.push_str("### Missing Footage\n\n");
        for item in missing {
            let _ = writeln!(out, "- {}", item);
        }
        out.push('\n');
    }
    let interviews = string_items(notes, "additional_interviews_needed");
    if !interviews.is_empty() {
        out.push_str("### Additional Interviews Needed\n\n");
        for item in interviews {
            let _ = writeln!(out, "- {}", item);
        }
        out.push('\n');
    }
}

/// Editor's cut as markdown.
pub fn editor_cut_to_markdown(cut: &Value) -> String {
    let mut out = String::new();

    out.push_str("*EDITOR'S CUT*\n\n");
    let _ = writeln!(out, "# {}\n", text(cut, "editor_cut_title").unwrap_or("Untitled"));
    let _ = writeln!(
        out,
        "{} | Runtime: {}\n",
        text(cut, "version").unwrap_or("v1"),
        text(cut, "total_runtime_estimate").unwrap_or("unknown")
    );

    if let Some(letter) = text(cut, "editor_letter") {
        out.push_str("## Letter to the Editor\n\n");
        quote_block(&mut out, letter);
    }

    for sequence in array(cut, "sequences") {
        write_sequence(&mut out, sequence);
    }

    if let Some(post) = cut.get("post_production") {
        write_post_production(&mut out, post);
    }

    let missing = array(cut, "missing_footage");
    if !missing.is_empty() {
        out.push_str("## Missing Footage\n\n");
        for item in missing {
            let _ = writeln!(
                out,
                "- **[{}]** {}",
                text(item, "priority").unwrap_or("tbd"),
                text(item, "description").unwrap_or("")
            );
            if let Some(suggestion) = text(item, "suggestion") {
                let _ = writeln!(out, "  - *{}*", suggestion);
            }
        }
        out.push('\n');
    }

    if let Some(specs) = cut.get("delivery_specs") {
        let parts: Vec<&str> = ["aspect_ratio", "resolution", "frame_rate", "audio_format"]
            .iter()
            .filter_map(|key| text(specs, key))
            .collect();
        if !parts.is_empty() {
            out.push_str("## Delivery Specs\n\n");
            let _ = writeln!(out, "{}\n", parts.join(" | "));
        }
    }

    out
}

fn write_sequence(out: &mut String, sequence: &Value) {
    let _ = write!(
        out,
        "## SEQ {}: {}",
        scalar(sequence, "sequence_number").unwrap_or_else(|| "?".to_string()),
        text(sequence, "sequence_title").unwrap_or("Untitled")
    );
    match text(sequence, "duration_estimate") {
        Some(duration) => {
            let _ = writeln!(out, " (~{})\n", duration);
        }
        None => out.push_str("\n\n"),
    }
    if let Some(purpose) = text(sequence, "purpose") {
        let _ = writeln!(out, "{}\n", purpose);
    }

    // music_cue is an object in editor's cuts and a plain string in screenplays
    match sequence.get("music_cue") {
        Some(Value::String(cue)) if !cue.trim().is_empty() => {
            let _ = writeln!(out, "**[MUSIC]** {}\n", cue.trim());
        }
        Some(cue @ Value::Object(_)) => {
            if let Some(track) = text(cue, "track_description") {
                let _ = writeln!(out, "**[MUSIC]** {}\n", track);
            }
            if let Some(dynamics) = text(cue, "dynamics") {
                let _ = writeln!(out, "*{}*\n", dynamics);
            }
        }
        _ => {}
    }

    for cut in array(sequence, "cuts") {
        write_cut(out, cut);
    }

    if let Some(pacing) = text(sequence, "pacing_notes") {
        let _ = writeln!(out, "**Pacing:** {}\n", pacing);
    }
    out.push_str("---\n\n");
}

fn write_cut(out: &mut String, cut: &Value) {
    let kind = text(cut, "type").unwrap_or("").replace('_', " ");
    let _ = write!(
        out,
        "### {} `{}`",
        scalar(cut, "cut_number").unwrap_or_default(),
        kind.to_uppercase()
    );
    if let Some(source) = text(cut, "source") {
        let _ = write!(out, " from {}", source);
    }
    if let (Some(tc_in), Some(tc_out)) = (text(cut, "timecode_in"), text(cut, "timecode_out")) {
        let _ = write!(out, " [{} -> {}]", tc_in, tc_out);
    }
    if let Some(duration) = text(cut, "duration") {
        let _ = write!(out, " ({})", duration);
    }
    out.push_str("\n\n");

    let _ = writeln!(out, "- **VIDEO:** {}", text(cut, "description").unwrap_or(""));
    if let Some(audio) = text(cut, "audio") {
        let _ = writeln!(out, "- **AUDIO:** {}", audio);
    }

    match cut.get("text_overlay") {
        Some(Value::String(overlay)) if !overlay.trim().is_empty() => {
            let _ = writeln!(out, "- **TEXT OVERLAY:** \u{201c}{}\u{201d}", overlay.trim());
        }
        Some(overlay @ Value::Object(_)) => {
            if let Some(overlay_text) = text(overlay, "text") {
                let _ = write!(out, "- **TEXT OVERLAY");
                if let Some(kind) = text(overlay, "type") {
                    let _ = write!(out, " ({})", kind.replace('_', " "));
                }
                let _ = writeln!(out, ":** \u{201c}{}\u{201d}", overlay_text);
                let meta: Vec<String> = [("position", "Position"), ("style", "Style"), ("timing", "Timing")]
                    .iter()
                    .filter_map(|(key, label)| text(overlay, key).map(|v| format!("{}: {}", label, v)))
                    .collect();
                if !meta.is_empty() {
                    let _ = writeln!(out, "  - {}", meta.join(" | "));
                }
            }
        }
        _ => {}
    }

    if let Some(graphics) = cut.get("graphics") {
        if graphics.get("needed").and_then(Value::as_bool) == Some(true) {
            let _ = write!(out, "- **GRAPHIC");
            if let Some(kind) = text(graphics, "type") {
                let _ = write!(out, " [{}]", kind.replace('_', " "));
            }
            let _ = writeln!(out, ":** {}", text(graphics, "description").unwrap_or(""));
            if let Some(timing) = text(graphics, "timing") {
                let _ = writeln!(out, "  - Timing: {}", timing);
            }
        }
    }

    let mut transitions = Vec::new();
    if let Some(t) = text(cut, "transition_in") {
        transitions.push(format!("IN: {}", t));
    }
    if let Some(t) = text(cut, "transition_out") {
        transitions.push(format!("OUT: {}", t));
    }
    if let Some(t) = text(cut, "transition") {
        transitions.push(t.to_string());
    }
    if !transitions.is_empty() {
        let _ = writeln!(out, "- **TRANSITION:** {}", transitions.join(" | "));
    }
    if let Some(notes) = text(cut, "editing_notes") {
        let _ = writeln!(out, "- **EDIT NOTES:** {}", notes);
    }
    out.push('\n');
}

fn write_post_production(out: &mut String, post: &Value) {
    out.push_str("## Post-Production\n\n");

    if let Some(grading) = post.get("color_grading") {
        out.push_str("### Color Grading\n\n");
        if let Some(look) = text(grading, "overall_look") {
            let _ = writeln!(out, "{}\n", look);
        }
        if let Some(per_type) = grading.get("per_type_treatment").and_then(Value::as_object) {
            for (kind, treatment) in per_type {
                if let Some(treatment) = treatment.as_str() {
                    let _ = writeln!(out, "- **{}:** {}", kind.replace('_', " "), treatment);
                }
            }
            out.push('\n');
        }
    }

    if let Some(sound) = post.get("sound_design") {
        out.push_str("### Sound Design\n\n");
        if let Some(mix) = text(sound, "overall_mix") {
            let _ = writeln!(out, "{}\n", mix);
        }
        if let Some(ambience) = text(sound, "ambient_beds") {
            let _ = writeln!(out, "Ambience: {}\n", ambience);
        }
        let effects = string_items(sound, "sound_effects");
        for effect in &effects {
            let _ = writeln!(out, "- {}", effect);
        }
        if !effects.is_empty() {
            out.push('\n');
        }
    }

    let graphics = array(post, "graphics_package");
    if !graphics.is_empty() {
        out.push_str("### Graphics Package\n\n");
        for item in graphics {
            let _ = writeln!(
                out,
                "- **[{}]** {}: {}",
                text(item, "priority").unwrap_or("tbd"),
                text(item, "item").unwrap_or(""),
                text(item, "description").unwrap_or("")
            );
        }
        out.push('\n');
    }
}
