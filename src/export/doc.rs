//! Word-compatible export: styled HTML inside the Office namespaces, saved as `.doc`.
//! Word, LibreOffice and Google Docs open it without conversion.

use super::{array, scalar, string_items, text};
use serde_json::Value;
use std::fmt::Write;

const GOLD: &str = "#E8C547";
const MUTED: &str = "#999999";
const WARNING: &str = "#FF6666";
const INTERVIEW_BLUE: &str = "#64C8FF";
const BROLL_GREEN: &str = "#64FF96";
const NARRATION_AMBER: &str = "#FFC864";
const TITLECARD_PURPLE: &str = "#C896FF";
const MONTAGE_PINK: &str = "#FF96C8";

const STYLE: &str = "\
@page{size:A4;margin:2cm}
body{font-family:Calibri,sans-serif;font-size:11pt;color:#F5F0E8;background:#0A0A0A;line-height:1.6}
h1{font-family:Georgia,serif;color:#E8C547;font-size:26pt;margin:20pt 0 6pt}
h2{font-family:Georgia,serif;font-size:17pt;margin:18pt 0 6pt;border-bottom:1pt solid #333}
h3{font-family:Georgia,serif;color:#E8C547;font-size:13pt;margin:14pt 0 4pt}
.lbl{font-family:Consolas,monospace;font-size:9pt;color:#E8C547;letter-spacing:3pt;font-weight:bold}
.meta{font-family:Consolas,monospace;font-size:9pt;color:#999999}
.scene{font-family:Consolas,monospace;color:#E8C547;font-weight:bold;text-transform:uppercase}
.dir{font-family:Consolas,monospace;font-size:10pt;color:#999999;font-style:italic}
.dlg{margin:6pt 0 6pt 36pt}
.dlg .spk{font-weight:bold;color:#64C8FF}
.nar{margin:6pt 0 6pt 24pt;border-left:3px solid #FFC864;padding-left:12pt;font-style:italic;color:#FFC864}
.demo{text-align:center;background:#1A1A2E;padding:8pt;margin:8pt 0}
.demo .t{font-family:Consolas,monospace;color:#64C8FF;font-weight:bold;text-transform:uppercase}
.pill{font-family:Consolas,monospace;font-size:8pt;font-weight:bold}
.hr{border-top:1pt solid #333;margin:14pt 0}
.box{border:1px solid #3A3420;padding:10pt;margin:8pt 0}
.box .t{font-family:Consolas,monospace;font-size:9pt;color:#E8C547;font-weight:bold;text-transform:uppercase}
.wbox{border:1px solid #4A2020;padding:10pt;margin:8pt 0}
.wbox .t{font-family:Consolas,monospace;font-size:9pt;color:#FF6666;font-weight:bold;text-transform:uppercase}
.bul{margin-left:18pt;margin-bottom:3pt}
.cut{border-left:3px solid #999999;padding-left:10pt;margin:10pt 0}
.ct{font-family:Consolas,monospace;font-size:8pt;font-weight:bold;text-transform:uppercase}
.tc{font-family:Consolas,monospace;font-size:9pt;color:#E8C547}
.olay{border:1px solid #3A2E4A;padding:6pt;margin:4pt 0}
.olay .tx{font-family:Consolas,monospace;color:#C896FF;font-weight:bold}
.gfx{border:1px solid #204A2E;padding:6pt;margin:4pt 0}
.en{font-family:Consolas,monospace;font-size:9pt;color:#FFC864;font-style:italic}
";

/// Escape text for HTML element content and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn wrap_document(body: &str) -> String {
    format!(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n\
         <head><meta charset=\"utf-8\">\n<style>\n{}</style></head><body>\n{}\n</body></html>\n",
        STYLE, body
    )
}

fn cut_colour(kind: &str) -> &'static str {
    match kind {
        "interview" | "screen_recording" => INTERVIEW_BLUE,
        "broll" => BROLL_GREEN,
        "narration" => NARRATION_AMBER,
        "title_card" => TITLECARD_PURPLE,
        "montage" => MONTAGE_PINK,
        _ => MUTED,
    }
}

fn esc(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_default()
}

/// Transcript-driven script as a Word document.
pub fn script_to_doc_html(script: &Value) -> String {
    let mut h = String::new();

    let _ = write!(
        h,
        "<h1 style=\"text-align:center\">{}</h1>",
        esc(text(script, "title").or(Some("Untitled")))
    );
    if let Some(subtitle) = text(script, "subtitle") {
        let _ = write!(
            h,
            "<p style=\"text-align:center;color:{};font-style:italic\">{}</p>",
            MUTED,
            escape_html(subtitle)
        );
    }
    let _ = write!(
        h,
        "<p style=\"text-align:center\" class=\"meta\">Duration: {}</p>",
        esc(text(script, "total_duration_estimate"))
    );
    if let Some(summary) = text(script, "story_summary") {
        let _ = write!(
            h,
            "<p style=\"text-align:center;color:{};font-style:italic\">{}</p>",
            MUTED,
            escape_html(summary)
        );
    }
    h.push_str("<div class=\"hr\"></div>");

    let characters = array(script, "characters");
    if !characters.is_empty() {
        h.push_str("<p class=\"lbl\">CAST</p>");
        for character in characters {
            let _ = write!(
                h,
                "<p><b style=\"color:{}\">{}</b> <span class=\"meta\">&mdash; {}</span></p>",
                GOLD,
                esc(text(character, "name")),
                esc(text(character, "role"))
            );
            if let Some(arc) = text(character, "arc") {
                let _ = write!(
                    h,
                    "<p style=\"color:{};font-style:italic;margin-left:18pt\">{}</p>",
                    MUTED,
                    escape_html(arc)
                );
            }
        }
        h.push_str("<div class=\"hr\"></div>");
    }

    for chapter in array(script, "chapters") {
        write_chapter(&mut h, chapter);
    }

    if let Some(music) = script.get("music_suggestions") {
        write_music_suggestions(&mut h, music);
    }
    if let Some(notes) = script.get("production_notes") {
        write_production_notes(&mut h, notes);
    }

    wrap_document(&h)
}

fn write_chapter(h: &mut String, chapter: &Value) {
    let title = esc(text(chapter, "chapter_title"));
    match chapter.get("chapter_number").and_then(Value::as_i64) {
        Some(n) if n > 0 => {
            let _ = write!(h, "<h2>Chapter {}: {}</h2>", n, title);
        }
        _ => {
            let _ = write!(h, "<h2>{}</h2>", title);
        }
    }
    let _ = write!(
        h,
        "<p class=\"meta\">~{}</p>",
        esc(text(chapter, "duration_estimate"))
    );
    if let Some(purpose) = text(chapter, "purpose") {
        let _ = write!(h, "<p style=\"color:{}\">{}</p>", MUTED, escape_html(purpose));
    }

    if let Some(music) = chapter.get("music_suggestion") {
        let parts: Vec<String> = ["mood", "tempo", "instruments"]
            .iter()
            .filter_map(|key| text(music, key).map(escape_html))
            .collect();
        if !parts.is_empty() {
            let _ = write!(
                h,
                "<p><span class=\"pill\" style=\"color:{c}\">[MUSIC]</span> <span style=\"color:{c}\">{}</span></p>",
                parts.join(" &nbsp;|&nbsp; "),
                c = MONTAGE_PINK
            );
        }
        if let Some(reference) = text(music, "reference") {
            let _ = write!(
                h,
                "<p style=\"color:{};font-style:italic;font-size:9pt\">Ref: {}</p>",
                MUTED,
                escape_html(reference)
            );
        }
    }

    for beat in array(chapter, "beats") {
        let content = esc(text(beat, "content"));
        match beat.get("type").and_then(Value::as_str).unwrap_or("") {
            "scene_heading" => {
                let _ = write!(h, "<p class=\"scene\">{}</p>", content);
            }
            "direction" => {
                let _ = write!(h, "<p class=\"dir\">[{}]</p>", content);
            }
            "dialogue" => {
                let _ = write!(
                    h,
                    "<div class=\"dlg\"><span class=\"spk\">{}:</span> &ldquo;{}&rdquo;</div>",
                    esc(text(beat, "speaker")),
                    content
                );
            }
            "narration" => {
                let _ = write!(h, "<div class=\"nar\">{}</div>", content);
            }
            "tool_demo" => {
                let _ = write!(
                    h,
                    "<div class=\"demo\"><div class=\"t\">SCREEN RECORDING: {}</div>",
                    esc(text(beat, "tool_name"))
                );
                if let Some(description) = text(beat, "description") {
                    let _ = write!(h, "<div class=\"d\">{}</div>", escape_html(description));
                }
                h.push_str("</div>");
            }
            _ => {
                let _ = write!(h, "<p style=\"color:{}\">{}</p>", MUTED, content);
            }
        }
    }
    h.push_str("<div class=\"hr\"></div>");
}

fn write_music_suggestions(h: &mut String, music: &Value) {
    h.push_str("<p class=\"lbl\">MUSIC &amp; SOUNDTRACK</p>");
    if let Some(vision) = text(music, "overall_vision") {
        let _ = write!(
            h,
            "<div class=\"box\"><div class=\"t\">Soundtrack Vision</div><p>{}</p>",
            escape_html(vision)
        );
        if let Some(style) = text(music, "soundtrack_style") {
            let _ = write!(h, "<p style=\"color:{}\">Style: {}</p>", MUTED, escape_html(style));
        }
        h.push_str("</div>");
    }
    let moments = array(music, "key_moments");
    if !moments.is_empty() {
        h.push_str("<h3>Key Musical Moments</h3>");
        for moment in moments {
            let _ = write!(
                h,
                "<p><b>{}</b> <span style=\"color:{}\">&mdash; {}</span></p>",
                esc(text(moment, "moment")),
                MUTED,
                esc(text(moment, "music"))
            );
        }
    }
    let genres = string_items(music, "recommended_genres");
    if !genres.is_empty() {
        let _ = write!(
            h,
            "<p style=\"color:{}\">Genres: {}</p>",
            MONTAGE_PINK,
            escape_html(&genres.join(", "))
        );
    }
    let tracks = string_items(music, "reference_tracks");
    if !tracks.is_empty() {
        h.push_str("<h3>Reference Tracks</h3>");
        for track in tracks {
            let _ = write!(
                h,
                "<p class=\"bul\" style=\"color:{}\">&bull; {}</p>",
                MUTED,
                escape_html(track)
            );
        }
    }
    h.push_str("<div class=\"hr\"></div>");
}

fn write_production_notes(h: &mut String, notes: &Value) {
    h.push_str("<p class=\"lbl\">PRODUCTION NOTES</p>");
    if let Some(note) = text(notes, "editors_note") {
        let _ = write!(
            h,
            "<div class=\"box\"><div class=\"t\">Editor's Note</div><p style=\"font-style:italic\">{}</p></div>",
            escape_html(note)
        );
    }
    for (key, label) in [("music_direction", "Music Direction"), ("visual_style", "Visual Style")] {
        if let Some(value) = text(notes, key) {
            let _ = write!(
                h,
                "<p style=\"color:{}\"><b>{}:</b> {}</p>",
                MUTED,
                label,
                escape_html(value)
            );
        }
    }
    let missing = string_items(notes, "missing_footage");
    if !missing.is_empty() {
        h.push_str("<div class=\"wbox\"><div class=\"t\">Missing Footage</div>");
        for item in missing {
            let _ = write!(
                h,
                "<p class=\"bul\" style=\"color:{}\">&bull; {}</p>",
                WARNING,
                escape_html(item)
            );
        }
        h.push_str("</div>");
    }
    let interviews = string_items(notes, "additional_interviews_needed");
    if !interviews.is_empty() {
        h.push_str("<h3>Additional Interviews Needed</h3>");
        for item in interviews {
            let _ = write!(h, "<p class=\"bul\">&bull; {}</p>", escape_html(item));
        }
    }
}

/// Editor's cut as a Word document.
pub fn editor_cut_to_doc_html(cut: &Value) -> String {
    let mut h = String::new();

    h.push_str("<p style=\"text-align:center\" class=\"lbl\">EDITOR'S CUT</p>");
    let _ = write!(
        h,
        "<h1 style=\"text-align:center\">{}</h1>",
        esc(text(cut, "editor_cut_title").or(Some("Untitled")))
    );
    let _ = write!(
        h,
        "<p style=\"text-align:center\" class=\"meta\">{} &nbsp;|&nbsp; Runtime: {}</p>",
        esc(text(cut, "version").or(Some("v1"))),
        esc(text(cut, "total_runtime_estimate"))
    );
    h.push_str("<div class=\"hr\"></div>");

    if let Some(letter) = text(cut, "editor_letter") {
        let _ = write!(
            h,
            "<div class=\"box\"><div class=\"t\">Letter to the Editor</div><p style=\"font-style:italic\">{}</p></div>",
            escape_html(letter)
        );
        h.push_str("<div class=\"hr\"></div>");
    }

    for sequence in array(cut, "sequences") {
        write_sequence(&mut h, sequence);
    }

    if let Some(post) = cut.get("post_production") {
        write_post_production(&mut h, post);
    }

    let missing = array(cut, "missing_footage");
    if !missing.is_empty() {
        h.push_str("<div class=\"wbox\"><div class=\"t\">Missing Footage</div>");
        for item in missing {
            let priority = text(item, "priority").unwrap_or("tbd");
            let colour = if priority == "critical" { WARNING } else { MUTED };
            let _ = write!(
                h,
                "<p><span class=\"pill\" style=\"color:{}\">[{}]</span> {}</p>",
                colour,
                escape_html(priority),
                esc(text(item, "description"))
            );
            if let Some(suggestion) = text(item, "suggestion") {
                let _ = write!(
                    h,
                    "<p style=\"color:{};font-style:italic;margin-left:18pt;font-size:9pt\">{}</p>",
                    MUTED,
                    escape_html(suggestion)
                );
            }
        }
        h.push_str("</div>");
    }

    if let Some(specs) = cut.get("delivery_specs") {
        let parts: Vec<&str> = ["aspect_ratio", "resolution", "frame_rate", "audio_format"]
            .iter()
            .filter_map(|key| text(specs, key))
            .collect();
        h.push_str("<p class=\"lbl\">DELIVERY SPECS</p>");
        let _ = write!(h, "<p class=\"meta\">{}</p>", escape_html(&parts.join("  |  ")));
    }

    wrap_document(&h)
}

fn write_sequence(h: &mut String, sequence: &Value) {
    let _ = write!(
        h,
        "<h2><span style=\"color:{};font-family:Consolas;font-size:10pt\">SEQ {}</span> &nbsp; {} <span class=\"meta\">~{}</span></h2>",
        GOLD,
        esc(scalar(sequence, "sequence_number").as_deref()),
        esc(text(sequence, "sequence_title")),
        esc(text(sequence, "duration_estimate"))
    );
    if let Some(purpose) = text(sequence, "purpose") {
        let _ = write!(h, "<p style=\"color:{}\">{}</p>", MUTED, escape_html(purpose));
    }

    let (track, dynamics) = match sequence.get("music_cue") {
        Some(Value::String(cue)) => (Some(cue.trim()).filter(|c| !c.is_empty()), None),
        Some(cue @ Value::Object(_)) => (text(cue, "track_description"), text(cue, "dynamics")),
        _ => (None, None),
    };
    if let Some(track) = track {
        let _ = write!(
            h,
            "<p><span class=\"pill\" style=\"color:{c}\">[MUSIC]</span> <span style=\"color:{c}\">{}</span></p>",
            escape_html(track),
            c = MONTAGE_PINK
        );
    }
    if let Some(dynamics) = dynamics {
        let _ = write!(
            h,
            "<p style=\"color:{};font-style:italic;font-size:9pt\">{}</p>",
            MUTED,
            escape_html(dynamics)
        );
    }

    for cut in array(sequence, "cuts") {
        write_cut(h, cut);
    }

    if let Some(pacing) = text(sequence, "pacing_notes") {
        let _ = write!(
            h,
            "<p style=\"color:{};font-size:9pt\"><b style=\"color:{}\">Pacing:</b> {}</p>",
            MUTED,
            GOLD,
            escape_html(pacing)
        );
    }
    h.push_str("<div class=\"hr\"></div>");
}

fn write_cut(h: &mut String, cut: &Value) {
    let kind = text(cut, "type").unwrap_or("");
    let colour = cut_colour(kind);
    let _ = write!(h, "<div class=\"cut\" style=\"border-left-color:{}\">", colour);

    let _ = write!(
        h,
        "<p style=\"margin-bottom:2pt\"><span class=\"meta\">{}</span> <span class=\"ct\" style=\"color:{}\">{}</span>",
        esc(scalar(cut, "cut_number").as_deref()),
        colour,
        escape_html(&kind.replace('_', " "))
    );
    if let Some(source) = text(cut, "source") {
        let _ = write!(
            h,
            " <span style=\"font-size:9pt;color:{}\">&larr; {}</span>",
            MUTED,
            escape_html(source)
        );
    }
    if let (Some(tc_in), Some(tc_out)) = (text(cut, "timecode_in"), text(cut, "timecode_out")) {
        let _ = write!(
            h,
            " <span class=\"tc\">[{} &rarr; {}]</span>",
            escape_html(tc_in),
            escape_html(tc_out)
        );
    }
    if let Some(duration) = text(cut, "duration") {
        let _ = write!(h, " <span class=\"meta\">({})</span>", escape_html(duration));
    }
    h.push_str("</p>");

    let _ = write!(
        h,
        "<p style=\"margin-bottom:2pt\"><b class=\"meta\">VIDEO: </b>{}</p>",
        esc(text(cut, "description"))
    );
    if let Some(audio) = text(cut, "audio") {
        let _ = write!(
            h,
            "<p style=\"margin-bottom:2pt\"><b class=\"meta\">AUDIO: </b>{}</p>",
            escape_html(audio)
        );
    }

    let overlay = cut.get("text_overlay");
    let overlay_text = match overlay {
        Some(Value::String(s)) => Some(s.trim()).filter(|s| !s.is_empty()),
        Some(o @ Value::Object(_)) => text(o, "text"),
        _ => None,
    };
    if let (Some(overlay), Some(overlay_text)) = (overlay, overlay_text) {
        let _ = write!(
            h,
            "<div class=\"olay\"><span class=\"pill\" style=\"color:{}\">TEXT OVERLAY</span>",
            TITLECARD_PURPLE
        );
        if let Some(kind) = text(overlay, "type") {
            let _ = write!(h, " <span class=\"meta\">{}</span>", escape_html(&kind.replace('_', " ")));
        }
        let _ = write!(h, "<div class=\"tx\">&ldquo;{}&rdquo;</div>", escape_html(overlay_text));
        let meta: Vec<String> = [("position", "Position"), ("style", "Style"), ("timing", "Timing")]
            .iter()
            .filter_map(|(key, label)| text(overlay, key).map(|v| format!("{}: {}", label, v)))
            .collect();
        if !meta.is_empty() {
            let _ = write!(
                h,
                "<p class=\"meta\" style=\"font-size:8pt\">{}</p>",
                escape_html(&meta.join(" | "))
            );
        }
        h.push_str("</div>");
    }

    if let Some(graphics) = cut.get("graphics") {
        if graphics.get("needed").and_then(Value::as_bool) == Some(true) {
            let _ = write!(
                h,
                "<div class=\"gfx\"><span class=\"pill\" style=\"color:{}\">GRAPHIC</span>",
                BROLL_GREEN
            );
            if let Some(kind) = text(graphics, "type") {
                let _ = write!(h, " <span class=\"meta\">[{}]</span>", escape_html(&kind.replace('_', " ")));
            }
            let _ = write!(h, "<p>{}</p>", esc(text(graphics, "description")));
            if let Some(timing) = text(graphics, "timing") {
                let _ = write!(
                    h,
                    "<p class=\"meta\" style=\"font-size:8pt\">Timing: {}</p>",
                    escape_html(timing)
                );
            }
            h.push_str("</div>");
        }
    }

    let transitions: Vec<String> = [("transition_in", "IN: "), ("transition_out", "OUT: "), ("transition", "")]
        .iter()
        .filter_map(|(key, prefix)| text(cut, key).map(|t| format!("{}{}", prefix, t)))
        .collect();
    if !transitions.is_empty() {
        let _ = write!(
            h,
            "<p class=\"meta\" style=\"font-size:8pt\">{}</p>",
            escape_html(&transitions.join("  |  "))
        );
    }
    if let Some(notes) = text(cut, "editing_notes") {
        let _ = write!(h, "<p class=\"en\">&#9986; {}</p>", escape_html(notes));
    }
    h.push_str("</div>");
}

fn write_post_production(h: &mut String, post: &Value) {
    h.push_str("<p class=\"lbl\">POST-PRODUCTION</p>");

    if let Some(grading) = post.get("color_grading") {
        h.push_str("<h3>Color Grading</h3>");
        let _ = write!(h, "<p>{}</p>", esc(text(grading, "overall_look")));
        if let Some(per_type) = grading.get("per_type_treatment").and_then(Value::as_object) {
            for (kind, treatment) in per_type {
                if let Some(treatment) = treatment.as_str() {
                    let _ = write!(
                        h,
                        "<p class=\"bul\" style=\"color:{}\">&bull; <b>{}:</b> {}</p>",
                        MUTED,
                        escape_html(&kind.replace('_', " ")),
                        escape_html(treatment)
                    );
                }
            }
        }
    }

    if let Some(sound) = post.get("sound_design") {
        h.push_str("<h3>Sound Design</h3>");
        if let Some(mix) = text(sound, "overall_mix") {
            let _ = write!(h, "<p>{}</p>", escape_html(mix));
        }
        if let Some(ambience) = text(sound, "ambient_beds") {
            let _ = write!(h, "<p style=\"color:{}\">Ambience: {}</p>", MUTED, escape_html(ambience));
        }
        for effect in string_items(sound, "sound_effects") {
            let _ = write!(
                h,
                "<p class=\"bul\" style=\"color:{}\">&bull; {}</p>",
                MUTED,
                escape_html(effect)
            );
        }
    }

    let graphics = array(post, "graphics_package");
    if !graphics.is_empty() {
        h.push_str("<h3>Graphics Package</h3>");
        for item in graphics {
            let priority = text(item, "priority").unwrap_or("tbd");
            let colour = if priority == "essential" { GOLD } else { MUTED };
            let _ = write!(
                h,
                "<p><span class=\"pill\" style=\"color:{}\">[{}]</span> <b>{}:</b> <span style=\"color:{}\">{}</span></p>",
                colour,
                escape_html(priority),
                esc(text(item, "item")),
                MUTED,
                esc(text(item, "description"))
            );
        }
    }
    h.push_str("<div class=\"hr\"></div>");
}
