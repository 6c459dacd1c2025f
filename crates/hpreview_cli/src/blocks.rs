use crate::content::Block;

/// Renders one content block to HTML. Unknown block types render a visible
/// placeholder instead of failing the page.
pub fn render_block(block: &Block) -> String {
    if block.settings.hide {
        return String::new();
    }
    match block.content_type.as_str() {
        "richTextRow" => render_rich_text(block),
        "imageRow" => render_image(block),
        "codeSnippetRow" => render_code_snippet(block),
        "videoRow" => render_video(block),
        other => format!(
            "<div class=\"block-unknown\">Unknown content type: <code>{}</code></div>",
            escape_html_text(other)
        ),
    }
}

pub fn render_blocks(blocks: &[Block]) -> String {
    blocks.iter().map(render_block).collect()
}

fn render_rich_text(block: &Block) -> String {
    // Markup comes from the CMS rich text editor and is trusted.
    let markup = block.property("content").unwrap_or("");
    format!("<div class=\"block-rich-text\">{markup}</div>")
}

fn render_image(block: &Block) -> String {
    let Some(src) = block.property("url") else {
        return String::new();
    };
    let caption = block.property("caption");
    let alt = block.property("alt").or(caption).unwrap_or("Image");
    let mut out = format!(
        "<figure class=\"block-image\"><img src=\"{}\" alt=\"{}\">",
        escape_attr(src),
        escape_attr(alt)
    );
    if let Some(caption) = caption {
        out.push_str(&format!("<figcaption>{}</figcaption>", escape_html_text(caption)));
    }
    out.push_str("</figure>");
    out
}

fn render_code_snippet(block: &Block) -> String {
    let code = block.property("code").unwrap_or("");
    let language = block.property("language").unwrap_or("code");
    let title = block.property("title").unwrap_or(language);
    format!(
        "<div class=\"block-code\"><div class=\"block-code-title\">{}</div><pre><code>{}</code></pre></div>",
        escape_html_text(title),
        escape_html_text(code)
    )
}

fn render_video(block: &Block) -> String {
    let Some(url) = block.property("videoUrl").or_else(|| block.property("video")) else {
        return String::new();
    };
    match youtube_id(url) {
        Some(id) => format!(
            "<figure class=\"block-video\"><iframe src=\"https://www.youtube.com/embed/{id}\" allowfullscreen></iframe></figure>"
        ),
        None => format!(
            "<p class=\"block-video-unsupported\">Video URL not supported: {}</p>",
            escape_html_text(url)
        ),
    }
}

fn youtube_id(url: &str) -> Option<&str> {
    const MARKERS: [&str; 3] = ["youtube.com/watch?v=", "youtube.com/embed/", "youtu.be/"];
    let rest = MARKERS
        .iter()
        .find_map(|marker| url.find(marker).map(|pos| &url[pos + marker.len()..]))?;
    let end = rest
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'))
        .unwrap_or(rest.len());
    let id = &rest[..end];
    if id.is_empty() { None } else { Some(id) }
}

pub(crate) fn escape_html_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_html_text(text).replace('\'', "&#39;")
}
