// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Markdown rendering for content bodies.
//!
//! Uses pulldown-cmark directly with the GFM extensions the authors rely
//! on. The output is embedded into pages verbatim, so raw HTML found in a
//! source is escaped rather than passed through.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html::push_html};

/// Render markdown to HTML.
///
/// Deterministic: the same source always yields byte-identical output.
/// Headings get an `id` derived from their text; h2 and below also get a
/// trailing `#` anchor link.
pub fn render_markdown(content: &str) -> String {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;

    let parser = Parser::new_ext(content, options).map(escape_raw_html);

    let events = inject_heading_anchors(parser);

    let mut html = String::with_capacity(content.len() * 2);
    push_html(&mut html, events.into_iter());
    html
}

/// Turn raw HTML blocks and inline tags into text so `push_html` escapes them.
fn escape_raw_html(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    }
}

/// Slugify text for use as an HTML id attribute.
///
/// Lowercases, replaces non-alphanumeric runs with hyphens, strips
/// leading/trailing hyphens.
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true; // suppress leading hyphen
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Buffer each heading's inner events, then re-emit it as `<hN id="slug">`.
fn inject_heading_anchors<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out: Vec<Event<'a>> = Vec::new();
    let mut in_heading: Option<HeadingLevel> = None;
    let mut heading_text = String::new();
    let mut heading_events: Vec<Event<'a>> = Vec::new();

    for event in events {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = Some(*level);
                heading_text.clear();
                heading_events.clear();
                heading_events.push(event);
            }
            Event::End(TagEnd::Heading(level)) if in_heading == Some(*level) => {
                let slug = slugify(&heading_text);
                let n = level_number(*level);

                if slug.is_empty() {
                    out.append(&mut heading_events);
                    out.push(event);
                } else {
                    out.push(Event::Html(format!("<h{} id=\"{}\">", n, slug).into()));
                    // Inner events only; the buffered Start(Heading) is replaced above.
                    out.extend(heading_events.drain(..).skip(1));
                    if n >= 2 {
                        out.push(Event::Html(
                            format!(
                                " <a class=\"anchor\" href=\"#{}\" aria-hidden=\"true\">#</a>",
                                slug
                            )
                            .into(),
                        ));
                    }
                    out.push(Event::Html(format!("</h{}>\n", n).into()));
                }
                in_heading = None;
            }
            Event::Text(text) | Event::Code(text) if in_heading.is_some() => {
                heading_text.push_str(text);
                heading_events.push(event);
            }
            _ if in_heading.is_some() => heading_events.push(event),
            _ => out.push(event),
        }
    }

    out
}
